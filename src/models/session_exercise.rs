use chrono::{DateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::{ExerciseSet, FromSqliteRow};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionExercise {
    pub id: String,
    pub session_id: String,
    pub exercise_name: String,
    /// Display position among siblings; not kept contiguous after deletes.
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

impl FromSqliteRow for SessionExercise {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            session_id: row.get("session_id")?,
            exercise_name: row.get("exercise_name")?,
            sort_order: row.get("sort_order")?,
            created_at: row.get("created_at")?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateSessionExercise {
    pub exercise_name: String,
    /// The caller's current exercise count for the session.
    pub sort_order: i32,
}

#[derive(Debug, Deserialize)]
pub struct RenameSessionExercise {
    pub exercise_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionExerciseDetail {
    #[serde(flatten)]
    pub exercise: SessionExercise,
    pub sets: Vec<ExerciseSet>,
}
