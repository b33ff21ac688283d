use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::WithRejection;

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::models::{CreateExerciseSet, ExerciseSet, SetCompleted, UpdateExerciseSet};
use crate::repositories::SetRepository;
use crate::response::{ok, ApiResult, Deleted};

#[derive(Clone)]
pub struct SetsState {
    pub set_repo: SetRepository,
}

fn set_not_found() -> AppError {
    AppError::NotFound("Set not found".to_string())
}

pub async fn list(
    State(state): State<SetsState>,
    auth_user: AuthUser,
    Path(exercise_id): Path<String>,
) -> ApiResult<Vec<ExerciseSet>> {
    let sets = state
        .set_repo
        .find_by_exercise(&auth_user.id, &exercise_id)
        .await?;
    ok(sets)
}

pub async fn add(
    State(state): State<SetsState>,
    auth_user: AuthUser,
    Path(exercise_id): Path<String>,
    WithRejection(Json(form), _): WithRejection<Json<CreateExerciseSet>, AppError>,
) -> ApiResult<ExerciseSet> {
    let set = state
        .set_repo
        .add(
            &auth_user.id,
            &exercise_id,
            form.reps,
            form.weight,
            form.weight_unit.unwrap_or_default(),
        )
        .await?;

    ok(set)
}

pub async fn update(
    State(state): State<SetsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    WithRejection(Json(form), _): WithRejection<Json<UpdateExerciseSet>, AppError>,
) -> ApiResult<ExerciseSet> {
    if !state
        .set_repo
        .update(&auth_user.id, &id, form.reps, form.weight)
        .await?
    {
        return Err(set_not_found());
    }

    let set = state
        .set_repo
        .find_by_id(&auth_user.id, &id)
        .await?
        .ok_or_else(set_not_found)?;
    ok(set)
}

pub async fn set_completed(
    State(state): State<SetsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    WithRejection(Json(form), _): WithRejection<Json<SetCompleted>, AppError>,
) -> ApiResult<ExerciseSet> {
    if !state
        .set_repo
        .set_completed(&auth_user.id, &id, form.completed)
        .await?
    {
        return Err(set_not_found());
    }

    let set = state
        .set_repo
        .find_by_id(&auth_user.id, &id)
        .await?
        .ok_or_else(set_not_found)?;
    ok(set)
}

pub async fn delete(
    State(state): State<SetsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Deleted> {
    if !state.set_repo.delete(&auth_user.id, &id).await? {
        return Err(set_not_found());
    }

    ok(Deleted { id })
}
