use axum::extract::State;

use crate::middleware::{AuthUser, LocalDate};
use crate::models::{TodayOverview, WeeklyStats};
use crate::repositories::StatsRepository;
use crate::response::{ok, ApiResult};

#[derive(Clone)]
pub struct StatsState {
    pub stats_repo: StatsRepository,
}

pub async fn weekly(
    State(state): State<StatsState>,
    auth_user: AuthUser,
    LocalDate(today): LocalDate,
) -> ApiResult<WeeklyStats> {
    let stats = state.stats_repo.weekly_stats(&auth_user.id, today).await?;
    ok(stats)
}

pub async fn today(
    State(state): State<StatsState>,
    auth_user: AuthUser,
    LocalDate(today): LocalDate,
) -> ApiResult<TodayOverview> {
    let overview = state.stats_repo.today_overview(&auth_user.id, today).await?;
    ok(overview)
}
