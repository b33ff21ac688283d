use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, TransactionBehavior};
use uuid::Uuid;

use super::set_repo;
use super::workout_repo::session_owned_by;
use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{FromSqliteRow, SessionExercise};

/// Exercises within one session.
#[derive(Clone)]
pub struct ExerciseRepository {
    pool: DbPool,
}

impl ExerciseRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, user_id: &str, id: &str) -> Result<Option<SessionExercise>> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT se.* FROM session_exercises se
                 JOIN workout_sessions ws ON ws.id = se.session_id
                 WHERE se.id = ? AND ws.user_id = ?",
            )?;
            let result = stmt
                .query_row(rusqlite::params![id, user_id], SessionExercise::from_row)
                .optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_by_session(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> Result<Vec<SessionExercise>> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        let session_id = session_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            if !session_owned_by(&conn, &session_id, &user_id)? {
                return Err(AppError::NotFound("Workout not found".to_string()));
            }
            let mut stmt = conn.prepare(
                "SELECT * FROM session_exercises WHERE session_id = ?
                 ORDER BY sort_order, created_at",
            )?;
            let exercises = stmt
                .query_map([&session_id], SessionExercise::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(exercises)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Append an exercise at the caller-supplied position.
    ///
    /// `sort_order` is taken as given; two appends against a stale count collide.
    pub async fn add(
        &self,
        user_id: &str,
        session_id: &str,
        exercise_name: &str,
        sort_order: i32,
    ) -> Result<SessionExercise> {
        let exercise_name = exercise_name.trim();
        if exercise_name.is_empty() {
            return Err(AppError::Validation(
                "Exercise name is required".to_string(),
            ));
        }
        if sort_order < 0 {
            return Err(AppError::Validation(
                "Sort order must not be negative".to_string(),
            ));
        }

        let exercise = SessionExercise {
            id: Uuid::new_v4().to_string(),
            session_id: session_id.to_string(),
            exercise_name: exercise_name.to_string(),
            sort_order,
            created_at: Utc::now(),
        };
        let exercise_clone = exercise.clone();

        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || -> Result<()> {
            let conn = pool.get()?;
            if !session_owned_by(&conn, &exercise_clone.session_id, &user_id)? {
                return Err(AppError::NotFound("Workout not found".to_string()));
            }
            conn.execute(
                "INSERT INTO session_exercises (id, session_id, exercise_name, sort_order, created_at)
                 VALUES (?, ?, ?, ?, ?)",
                rusqlite::params![
                    exercise_clone.id,
                    exercise_clone.session_id,
                    exercise_clone.exercise_name,
                    exercise_clone.sort_order,
                    exercise_clone.created_at
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

        Ok(exercise)
    }

    pub async fn rename(&self, user_id: &str, id: &str, exercise_name: &str) -> Result<bool> {
        let exercise_name = exercise_name.trim().to_string();
        if exercise_name.is_empty() {
            return Err(AppError::Validation(
                "Exercise name is required".to_string(),
            ));
        }

        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            if !exercise_owned_by(&conn, &id, &user_id)? {
                return Ok(false);
            }
            let rows = conn.execute(
                "UPDATE session_exercises SET exercise_name = ? WHERE id = ?",
                rusqlite::params![exercise_name, id],
            )?;
            Ok(rows > 0)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Delete an exercise together with all of its sets.
    pub async fn delete(&self, user_id: &str, id: &str) -> Result<bool> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            if !exercise_owned_by(&tx, &id, &user_id)? {
                return Ok(false);
            }
            let sets = set_repo::delete_for_exercise(&tx, &id)?;
            tx.execute("DELETE FROM session_exercises WHERE id = ?", [&id])?;
            tx.commit()?;

            tracing::debug!("Deleted exercise {} with {} sets", id, sets);
            Ok(true)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}

pub(crate) fn exercise_owned_by(
    conn: &Connection,
    exercise_id: &str,
    user_id: &str,
) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT COUNT(*) > 0 FROM session_exercises se
         JOIN workout_sessions ws ON ws.id = se.session_id
         WHERE se.id = ? AND ws.user_id = ?",
        [exercise_id, user_id],
        |row| row.get(0),
    )
}

/// Remove every exercise of a session and their sets. Runs on the caller's transaction.
pub(crate) fn delete_for_session(conn: &Connection, session_id: &str) -> rusqlite::Result<usize> {
    let mut stmt = conn.prepare("SELECT id FROM session_exercises WHERE session_id = ?")?;
    let exercise_ids = stmt
        .query_map([session_id], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    for exercise_id in &exercise_ids {
        set_repo::delete_for_exercise(conn, exercise_id)?;
    }
    conn.execute(
        "DELETE FROM session_exercises WHERE session_id = ?",
        [session_id],
    )
}
