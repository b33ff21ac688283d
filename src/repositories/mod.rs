pub mod exercise_repo;
pub mod session_repo;
pub mod set_repo;
pub mod stats_repo;
pub mod user_repo;
pub mod workout_repo;

#[cfg(test)]
pub(crate) mod test_support;

pub use exercise_repo::ExerciseRepository;
pub use session_repo::SessionRepository;
pub use set_repo::SetRepository;
pub use stats_repo::StatsRepository;
pub use user_repo::UserRepository;
pub use workout_repo::WorkoutRepository;
