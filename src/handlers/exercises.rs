use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::WithRejection;

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::models::{CreateSessionExercise, RenameSessionExercise, SessionExercise};
use crate::repositories::ExerciseRepository;
use crate::response::{ok, ApiResult, Deleted};

#[derive(Clone)]
pub struct ExercisesState {
    pub exercise_repo: ExerciseRepository,
}

fn exercise_not_found() -> AppError {
    AppError::NotFound("Exercise not found".to_string())
}

pub async fn add(
    State(state): State<ExercisesState>,
    auth_user: AuthUser,
    Path(session_id): Path<String>,
    WithRejection(Json(form), _): WithRejection<Json<CreateSessionExercise>, AppError>,
) -> ApiResult<SessionExercise> {
    let exercise = state
        .exercise_repo
        .add(
            &auth_user.id,
            &session_id,
            &form.exercise_name,
            form.sort_order,
        )
        .await?;

    ok(exercise)
}

pub async fn rename(
    State(state): State<ExercisesState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    WithRejection(Json(form), _): WithRejection<Json<RenameSessionExercise>, AppError>,
) -> ApiResult<SessionExercise> {
    if !state
        .exercise_repo
        .rename(&auth_user.id, &id, &form.exercise_name)
        .await?
    {
        return Err(exercise_not_found());
    }

    let exercise = state
        .exercise_repo
        .find_by_id(&auth_user.id, &id)
        .await?
        .ok_or_else(exercise_not_found)?;

    ok(exercise)
}

pub async fn delete(
    State(state): State<ExercisesState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Deleted> {
    if !state.exercise_repo.delete(&auth_user.id, &id).await? {
        return Err(exercise_not_found());
    }

    ok(Deleted { id })
}
