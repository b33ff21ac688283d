pub mod exercise_set;
pub mod from_row;
pub mod session_exercise;
pub mod stats;
pub mod user;
pub mod workout_session;
pub mod workout_tree;

pub use exercise_set::{CreateExerciseSet, ExerciseSet, SetCompleted, UpdateExerciseSet, WeightUnit};
pub use from_row::FromSqliteRow;
pub use session_exercise::{
    CreateSessionExercise, RenameSessionExercise, SessionExercise, SessionExerciseDetail,
};
pub use stats::{TodayOverview, WeeklyStats};
pub use user::{ResolveIdentity, User};
pub use workout_session::{
    CreateWorkoutSession, SessionTotals, UpdateWorkoutSession, WorkoutSession,
    WorkoutSessionDetail, WorkoutSessionSummary,
};
pub use workout_tree::WorkoutArena;
