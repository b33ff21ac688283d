use axum::{
    routing::{get, patch, post, put},
    Extension, Router,
};

use crate::handlers::{auth, exercises, health, sets, stats, timer, workouts};
use crate::repositories::SessionRepository;

pub fn create_router(
    auth_state: auth::AuthState,
    workouts_state: workouts::WorkoutsState,
    exercises_state: exercises::ExercisesState,
    sets_state: sets::SetsState,
    stats_state: stats::StatsState,
    timer_state: timer::TimerState,
    session_repo: SessionRepository,
) -> Router {
    Router::new()
        // Auth routes
        .route("/auth/session", post(auth::create_session))
        .route("/auth/logout", post(auth::logout))
        .with_state(auth_state)
        // Workout session routes
        .route("/workouts", post(workouts::create))
        .route("/workouts/today", get(workouts::list_today))
        .route("/workouts/history", get(workouts::history))
        .route(
            "/workouts/{id}",
            get(workouts::show)
                .patch(workouts::update)
                .delete(workouts::delete),
        )
        .with_state(workouts_state)
        // Exercise routes
        .route("/workouts/{id}/exercises", post(exercises::add))
        .route(
            "/exercises/{id}",
            patch(exercises::rename).delete(exercises::delete),
        )
        .with_state(exercises_state)
        // Set routes
        .route("/exercises/{id}/sets", get(sets::list).post(sets::add))
        .route("/sets/{id}", put(sets::update).delete(sets::delete))
        .route("/sets/{id}/completed", post(sets::set_completed))
        .with_state(sets_state)
        // Stats routes
        .route("/stats/weekly", get(stats::weekly))
        .route("/stats/today", get(stats::today))
        .with_state(stats_state)
        // Timer routes
        .route("/timer/start", post(timer::start))
        .route("/timer/stop", post(timer::stop))
        .route("/timer/elapsed", post(timer::elapsed))
        .route("/timer/reset", post(timer::reset))
        .with_state(timer_state)
        .route("/health", get(health::health_check))
        // Session lookup for the AuthUser extractor
        .layer(Extension(session_repo))
}
