use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::{FromSqliteRow, SessionExerciseDetail};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutSession {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub notes: Option<String>,
    /// Caller-local calendar day, fixed at creation.
    pub workout_date: NaiveDate,
    /// Null until the workout ends.
    pub duration_seconds: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl FromSqliteRow for WorkoutSession {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            name: row.get("name")?,
            notes: row.get("notes")?,
            workout_date: row.get("workout_date")?,
            duration_seconds: row.get("duration_seconds")?,
            created_at: row.get("created_at")?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateWorkoutSession {
    pub name: String,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateWorkoutSession {
    pub name: Option<String>,
    pub notes: Option<String>,
    pub duration_seconds: Option<i64>,
}

impl UpdateWorkoutSession {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.notes.is_none() && self.duration_seconds.is_none()
    }
}

/// History row: session fields plus child counts derived at read time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutSessionSummary {
    pub id: String,
    pub name: String,
    pub notes: Option<String>,
    pub workout_date: NaiveDate,
    pub duration_seconds: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub exercise_count: i64,
    pub total_sets: i64,
}

impl FromSqliteRow for WorkoutSessionSummary {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            notes: row.get("notes")?,
            workout_date: row.get("workout_date")?,
            duration_seconds: row.get("duration_seconds")?,
            created_at: row.get("created_at")?,
            exercise_count: row.get("exercise_count")?,
            total_sets: row.get("total_sets")?,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTotals {
    pub exercise_count: i64,
    pub total_sets: i64,
    pub completed_sets: i64,
}

/// Full nested session: exercises by `sort_order`, sets by `set_number`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutSessionDetail {
    #[serde(flatten)]
    pub session: WorkoutSession,
    pub exercises: Vec<SessionExerciseDetail>,
    pub totals: SessionTotals,
}

impl WorkoutSessionDetail {
    pub fn new(session: WorkoutSession, exercises: Vec<SessionExerciseDetail>) -> Self {
        let totals = SessionTotals {
            exercise_count: exercises.len() as i64,
            total_sets: exercises.iter().map(|e| e.sets.len() as i64).sum(),
            completed_sets: exercises
                .iter()
                .flat_map(|e| e.sets.iter())
                .filter(|s| s.completed)
                .count() as i64,
        };
        Self {
            session,
            exercises,
            totals,
        }
    }
}
