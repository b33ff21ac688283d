use axum::{extract::State, Json};
use axum_extra::extract::WithRejection;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::response::{ok, ApiResult};
use crate::timer::{TimerController, TimerStatus, TimerTransition, WorkoutTimer};

#[derive(Clone)]
pub struct TimerState {
    pub controller: TimerController,
}

#[derive(Deserialize)]
pub struct StartTimer {
    #[serde(default)]
    timer: WorkoutTimer,
    session_id: String,
}

#[derive(Deserialize)]
pub struct TimerRequest {
    #[serde(default)]
    timer: WorkoutTimer,
}

#[derive(Serialize)]
pub struct ElapsedTime {
    status: TimerStatus,
    session_id: Option<String>,
    elapsed_seconds: i64,
}

pub async fn start(
    State(state): State<TimerState>,
    auth_user: AuthUser,
    WithRejection(Json(form), _): WithRejection<Json<StartTimer>, AppError>,
) -> ApiResult<TimerTransition> {
    let transition = state
        .controller
        .start(&auth_user.id, &form.timer, &form.session_id, Utc::now())
        .await?;
    ok(transition)
}

pub async fn stop(
    State(state): State<TimerState>,
    auth_user: AuthUser,
    WithRejection(Json(form), _): WithRejection<Json<TimerRequest>, AppError>,
) -> ApiResult<TimerTransition> {
    let transition = state
        .controller
        .stop(&auth_user.id, &form.timer, Utc::now())
        .await?;
    ok(transition)
}

/// Live display value; nothing is persisted.
pub async fn elapsed(
    _auth_user: AuthUser,
    WithRejection(Json(form), _): WithRejection<Json<TimerRequest>, AppError>,
) -> ApiResult<ElapsedTime> {
    let elapsed_seconds = form.timer.elapsed_seconds(Utc::now())?;
    ok(ElapsedTime {
        status: form.timer.status,
        elapsed_seconds,
        session_id: form.timer.session_id,
    })
}

pub async fn reset(_auth_user: AuthUser) -> ApiResult<TimerTransition> {
    ok(TimerTransition {
        timer: WorkoutTimer::reset(),
        persisted: None,
    })
}
