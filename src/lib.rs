pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod migrations;
pub mod models;
pub mod repositories;
pub mod response;
pub mod routes;
pub mod session;
pub mod timer;

use axum::Router;

use config::Config;
use db::DbPool;
use handlers::{auth, exercises, sets, stats, timer as timer_handlers, workouts};
use repositories::{
    ExerciseRepository, SessionRepository, SetRepository, StatsRepository, UserRepository,
    WorkoutRepository,
};

/// Wire repositories into handler states and build the router.
pub fn build_app(pool: DbPool, config: &Config) -> Router {
    let user_repo = UserRepository::new(pool.clone());
    let session_repo = SessionRepository::new(pool.clone());
    let workout_repo = WorkoutRepository::new(pool.clone());
    let exercise_repo = ExerciseRepository::new(pool.clone());
    let set_repo = SetRepository::new(pool.clone());
    let stats_repo = StatsRepository::new(pool);

    let auth_state = auth::AuthState {
        user_repo,
        session_repo: session_repo.clone(),
        identity_header: config.identity_header.clone(),
    };
    let workouts_state = workouts::WorkoutsState {
        workout_repo: workout_repo.clone(),
    };
    let exercises_state = exercises::ExercisesState { exercise_repo };
    let sets_state = sets::SetsState { set_repo };
    let stats_state = stats::StatsState { stats_repo };
    let timer_state = timer_handlers::TimerState {
        controller: timer::TimerController::new(workout_repo),
    };

    routes::create_router(
        auth_state,
        workouts_state,
        exercises_state,
        sets_state,
        stats_state,
        timer_state,
        session_repo,
    )
}
