use chrono::{NaiveDate, Utc};
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, TransactionBehavior};
use uuid::Uuid;

use super::exercise_repo;
use super::user_repo::recompute_workout_counter;
use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{
    ExerciseSet, FromSqliteRow, SessionExercise, UpdateWorkoutSession, WorkoutArena,
    WorkoutSession, WorkoutSessionDetail, WorkoutSessionSummary,
};

pub const DEFAULT_HISTORY_LIMIT: i64 = 20;
pub const MAX_HISTORY_LIMIT: i64 = 100;

/// Workout sessions, scoped to a user and a calendar day.
#[derive(Clone)]
pub struct WorkoutRepository {
    pool: DbPool,
}

impl WorkoutRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create a session on the caller's local `workout_date`.
    ///
    /// The profile workout counter is then recomputed from the session rows.
    /// That step is best-effort and never fails the create.
    pub async fn create(
        &self,
        user_id: &str,
        workout_date: NaiveDate,
        name: &str,
        notes: Option<&str>,
    ) -> Result<WorkoutSession> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Workout name is required".to_string()));
        }

        let session = WorkoutSession {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            name: name.to_string(),
            notes: normalize_notes(notes),
            workout_date,
            duration_seconds: None,
            created_at: Utc::now(),
        };
        let session_clone = session.clone();

        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<()> {
            let conn = pool.get()?;
            conn.execute(
                "INSERT INTO workout_sessions
                    (id, user_id, name, notes, workout_date, duration_seconds, created_at)
                 VALUES (?, ?, ?, ?, ?, NULL, ?)",
                rusqlite::params![
                    session_clone.id,
                    session_clone.user_id,
                    session_clone.name,
                    session_clone.notes,
                    session_clone.workout_date,
                    session_clone.created_at
                ],
            )?;

            if let Err(e) = recompute_workout_counter(&conn, &session_clone.user_id) {
                tracing::warn!(
                    "Failed to refresh workout counter for user {}: {}",
                    session_clone.user_id,
                    e
                );
            }
            Ok(())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

        Ok(session)
    }

    pub async fn find_by_id(&self, user_id: &str, id: &str) -> Result<Option<WorkoutSession>> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt =
                conn.prepare("SELECT * FROM workout_sessions WHERE id = ? AND user_id = ?")?;
            let result = stmt
                .query_row(rusqlite::params![id, user_id], WorkoutSession::from_row)
                .optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Sessions on `workout_date`, earliest-started first, as full trees.
    pub async fn list_for_day(
        &self,
        user_id: &str,
        workout_date: NaiveDate,
    ) -> Result<Vec<WorkoutSessionDetail>> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT * FROM workout_sessions
                 WHERE user_id = ? AND workout_date = ?
                 ORDER BY created_at ASC, rowid ASC",
            )?;
            let sessions = stmt
                .query_map(
                    rusqlite::params![user_id, workout_date],
                    WorkoutSession::from_row,
                )?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(load_details(&conn, sessions)?)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn get_detail(&self, user_id: &str, id: &str) -> Result<Option<WorkoutSessionDetail>> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let session = conn
                .query_row(
                    "SELECT * FROM workout_sessions WHERE id = ? AND user_id = ?",
                    rusqlite::params![id, user_id],
                    WorkoutSession::from_row,
                )
                .optional()?;

            match session {
                Some(session) => Ok(load_details(&conn, vec![session])?.pop()),
                None => Ok(None),
            }
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Most recent sessions first, with child counts derived at read time.
    pub async fn list_history(&self, user_id: &str, limit: i64) -> Result<Vec<WorkoutSessionSummary>> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        let limit = limit.clamp(1, MAX_HISTORY_LIMIT);
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT ws.*,
                    (SELECT COUNT(*) FROM session_exercises se
                     WHERE se.session_id = ws.id) AS exercise_count,
                    (SELECT COUNT(*) FROM exercise_sets es
                     JOIN session_exercises se ON se.id = es.exercise_id
                     WHERE se.session_id = ws.id) AS total_sets
                 FROM workout_sessions ws
                 WHERE ws.user_id = ?
                 ORDER BY ws.workout_date DESC, ws.created_at DESC, ws.rowid DESC
                 LIMIT ?",
            )?;
            let summaries = stmt
                .query_map(
                    rusqlite::params![user_id, limit],
                    WorkoutSessionSummary::from_row,
                )?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(summaries)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Partial update. `workout_date` is never writable.
    pub async fn update(
        &self,
        user_id: &str,
        id: &str,
        changes: UpdateWorkoutSession,
    ) -> Result<bool> {
        let mut updates = Vec::new();
        let mut values: Vec<Value> = Vec::new();

        if let Some(name) = &changes.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(AppError::Validation("Workout name is required".to_string()));
            }
            updates.push("name = ?");
            values.push(name.to_string().into());
        }
        if let Some(notes) = &changes.notes {
            updates.push("notes = ?");
            values.push(normalize_notes(Some(notes)).into());
        }
        if let Some(duration) = changes.duration_seconds {
            if duration < 0 {
                return Err(AppError::Validation(
                    "Duration must not be negative".to_string(),
                ));
            }
            updates.push("duration_seconds = ?");
            values.push(duration.into());
        }

        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            if updates.is_empty() {
                return Ok(session_owned_by(&conn, &id, &user_id)?);
            }

            let query = format!(
                "UPDATE workout_sessions SET {} WHERE id = ? AND user_id = ?",
                updates.join(", ")
            );
            values.push(id.into());
            values.push(user_id.into());

            let rows = conn.execute(&query, rusqlite::params_from_iter(values))?;
            Ok(rows > 0)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Delete a session with all of its exercises and their sets.
    pub async fn delete(&self, user_id: &str, id: &str) -> Result<bool> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            if !session_owned_by(&tx, &id, &user_id)? {
                return Ok(false);
            }
            let exercises = exercise_repo::delete_for_session(&tx, &id)?;
            tx.execute("DELETE FROM workout_sessions WHERE id = ?", [&id])?;
            tx.commit()?;

            tracing::debug!("Deleted workout {} with {} exercises", id, exercises);

            if let Err(e) = recompute_workout_counter(&conn, &user_id) {
                tracing::warn!("Failed to refresh workout counter for user {}: {}", user_id, e);
            }
            Ok(true)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}

pub(crate) fn session_owned_by(
    conn: &Connection,
    session_id: &str,
    user_id: &str,
) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT COUNT(*) > 0 FROM workout_sessions WHERE id = ? AND user_id = ?",
        [session_id, user_id],
        |row| row.get(0),
    )
}

/// Load the exercises and sets of `sessions` as flat rows and assemble the trees.
pub(crate) fn load_details(
    conn: &Connection,
    sessions: Vec<WorkoutSession>,
) -> rusqlite::Result<Vec<WorkoutSessionDetail>> {
    if sessions.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<&str> = sessions.iter().map(|s| s.id.as_str()).collect();
    let placeholders = vec!["?"; ids.len()].join(", ");

    let exercises = conn
        .prepare(&format!(
            "SELECT * FROM session_exercises WHERE session_id IN ({})",
            placeholders
        ))?
        .query_map(rusqlite::params_from_iter(&ids), SessionExercise::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let sets = conn
        .prepare(&format!(
            "SELECT es.* FROM exercise_sets es
             JOIN session_exercises se ON se.id = es.exercise_id
             WHERE se.session_id IN ({})",
            placeholders
        ))?
        .query_map(rusqlite::params_from_iter(&ids), ExerciseSet::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(WorkoutArena::new(exercises, sets).into_details(sessions))
}

fn normalize_notes(notes: Option<&str>) -> Option<String> {
    notes
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
}
