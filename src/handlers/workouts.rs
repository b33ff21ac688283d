use axum::{
    extract::{Path, Query, State},
    Json,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;

use crate::error::AppError;
use crate::middleware::{AuthUser, LocalDate};
use crate::models::{
    CreateWorkoutSession, UpdateWorkoutSession, WorkoutSession, WorkoutSessionDetail,
    WorkoutSessionSummary,
};
use crate::repositories::workout_repo::DEFAULT_HISTORY_LIMIT;
use crate::repositories::WorkoutRepository;
use crate::response::{ok, ApiResult, Deleted};

#[derive(Clone)]
pub struct WorkoutsState {
    pub workout_repo: WorkoutRepository,
}

#[derive(Deserialize)]
pub struct HistoryQuery {
    limit: Option<i64>,
}

fn workout_not_found() -> AppError {
    AppError::NotFound("Workout not found".to_string())
}

pub async fn create(
    State(state): State<WorkoutsState>,
    auth_user: AuthUser,
    LocalDate(today): LocalDate,
    WithRejection(Json(form), _): WithRejection<Json<CreateWorkoutSession>, AppError>,
) -> ApiResult<WorkoutSession> {
    let workout = state
        .workout_repo
        .create(&auth_user.id, today, &form.name, form.notes.as_deref())
        .await?;

    tracing::info!("Created workout {} for {}", workout.id, workout.workout_date);
    ok(workout)
}

pub async fn list_today(
    State(state): State<WorkoutsState>,
    auth_user: AuthUser,
    LocalDate(today): LocalDate,
) -> ApiResult<Vec<WorkoutSessionDetail>> {
    let workouts = state.workout_repo.list_for_day(&auth_user.id, today).await?;
    ok(workouts)
}

pub async fn history(
    State(state): State<WorkoutsState>,
    auth_user: AuthUser,
    WithRejection(Query(query), _): WithRejection<Query<HistoryQuery>, AppError>,
) -> ApiResult<Vec<WorkoutSessionSummary>> {
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    let workouts = state.workout_repo.list_history(&auth_user.id, limit).await?;
    ok(workouts)
}

pub async fn show(
    State(state): State<WorkoutsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<WorkoutSessionDetail> {
    let workout = state
        .workout_repo
        .get_detail(&auth_user.id, &id)
        .await?
        .ok_or_else(workout_not_found)?;

    ok(workout)
}

pub async fn update(
    State(state): State<WorkoutsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    WithRejection(Json(form), _): WithRejection<Json<UpdateWorkoutSession>, AppError>,
) -> ApiResult<WorkoutSession> {
    let updated = state.workout_repo.update(&auth_user.id, &id, form).await?;
    if !updated {
        return Err(workout_not_found());
    }

    let workout = state
        .workout_repo
        .find_by_id(&auth_user.id, &id)
        .await?
        .ok_or_else(workout_not_found)?;

    ok(workout)
}

pub async fn delete(
    State(state): State<WorkoutsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Deleted> {
    if !state.workout_repo.delete(&auth_user.id, &id).await? {
        return Err(workout_not_found());
    }

    ok(Deleted { id })
}
