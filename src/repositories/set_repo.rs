use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, TransactionBehavior};
use uuid::Uuid;

use super::exercise_repo::exercise_owned_by;
use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{ExerciseSet, FromSqliteRow, WeightUnit};

/// Exercise ids belonging to the user bound at this placeholder.
const OWNED_EXERCISE_IDS: &str = "SELECT se.id FROM session_exercises se
     JOIN workout_sessions ws ON ws.id = se.session_id
     WHERE ws.user_id = ?";

/// Sets within one exercise. Owns the numbering invariant: the set numbers of an
/// exercise are always exactly `1..=n`.
#[derive(Clone)]
pub struct SetRepository {
    pool: DbPool,
}

impl SetRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, user_id: &str, id: &str) -> Result<Option<ExerciseSet>> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let sql = format!(
                "SELECT * FROM exercise_sets WHERE id = ? AND exercise_id IN ({})",
                OWNED_EXERCISE_IDS
            );
            let result = conn
                .query_row(&sql, rusqlite::params![id, user_id], ExerciseSet::from_row)
                .optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_by_exercise(&self, user_id: &str, exercise_id: &str) -> Result<Vec<ExerciseSet>> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        let exercise_id = exercise_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            if !exercise_owned_by(&conn, &exercise_id, &user_id)? {
                return Err(AppError::NotFound("Exercise not found".to_string()));
            }
            let mut stmt = conn.prepare(
                "SELECT * FROM exercise_sets WHERE exercise_id = ? ORDER BY set_number, created_at",
            )?;
            let sets = stmt
                .query_map([&exercise_id], ExerciseSet::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(sets)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Append a set. Its number is `MAX(set_number) + 1`, or 1 for the first set.
    pub async fn add(
        &self,
        user_id: &str,
        exercise_id: &str,
        reps: i32,
        weight: Option<f64>,
        weight_unit: WeightUnit,
    ) -> Result<ExerciseSet> {
        validate_reps(reps)?;
        validate_weight(weight)?;

        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        let exercise_id = exercise_id.to_string();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            // IMMEDIATE takes the write lock before reading MAX(set_number).
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            if !exercise_owned_by(&tx, &exercise_id, &user_id)? {
                return Err(AppError::NotFound("Exercise not found".to_string()));
            }

            let set_number: i32 = tx.query_row(
                "SELECT COALESCE(MAX(set_number), 0) + 1 FROM exercise_sets WHERE exercise_id = ?",
                [&exercise_id],
                |row| row.get(0),
            )?;

            let set = ExerciseSet {
                id: Uuid::new_v4().to_string(),
                exercise_id,
                set_number,
                reps,
                weight,
                weight_unit,
                completed: false,
                created_at: Utc::now(),
            };

            tx.execute(
                "INSERT INTO exercise_sets
                    (id, exercise_id, set_number, reps, weight, weight_unit, completed, created_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
                rusqlite::params![
                    set.id,
                    set.exercise_id,
                    set.set_number,
                    set.reps,
                    set.weight,
                    set.weight_unit.as_str(),
                    set.completed,
                    set.created_at
                ],
            )?;
            tx.commit()?;

            Ok(set)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Field-only update; numbering is untouched.
    pub async fn update(
        &self,
        user_id: &str,
        id: &str,
        reps: i32,
        weight: Option<f64>,
    ) -> Result<bool> {
        validate_reps(reps)?;
        validate_weight(weight)?;

        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let sql = format!(
                "UPDATE exercise_sets SET reps = ?, weight = ?
                 WHERE id = ? AND exercise_id IN ({})",
                OWNED_EXERCISE_IDS
            );
            let rows = conn.execute(&sql, rusqlite::params![reps, weight, id, user_id])?;
            Ok(rows > 0)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn set_completed(&self, user_id: &str, id: &str, completed: bool) -> Result<bool> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let sql = format!(
                "UPDATE exercise_sets SET completed = ? WHERE id = ? AND exercise_id IN ({})",
                OWNED_EXERCISE_IDS
            );
            let rows = conn.execute(&sql, rusqlite::params![completed, id, user_id])?;
            Ok(rows > 0)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Delete a set and close the gap it leaves.
    ///
    /// The delete and the single "decrement every later sibling" statement share
    /// one transaction, so numbering is never observed with a hole.
    pub async fn delete(&self, user_id: &str, id: &str) -> Result<bool> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let sql = format!(
                "SELECT exercise_id, set_number FROM exercise_sets
                 WHERE id = ? AND exercise_id IN ({})",
                OWNED_EXERCISE_IDS
            );
            let target: Option<(String, i32)> = tx
                .query_row(&sql, rusqlite::params![id, user_id], |row| {
                    Ok((row.get(0)?, row.get(1)?))
                })
                .optional()?;

            let Some((exercise_id, set_number)) = target else {
                return Ok(false);
            };

            tx.execute("DELETE FROM exercise_sets WHERE id = ?", [&id])?;
            let renumbered = tx.execute(
                "UPDATE exercise_sets SET set_number = set_number - 1
                 WHERE exercise_id = ? AND set_number > ?",
                rusqlite::params![exercise_id, set_number],
            )?;
            tx.commit()?;

            tracing::debug!(
                "Deleted set {} (#{}) of exercise {}, renumbered {} later sets",
                id,
                set_number,
                exercise_id,
                renumbered
            );
            Ok(true)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}

/// Remove every set of an exercise. Runs on the caller's connection or transaction.
pub(crate) fn delete_for_exercise(conn: &Connection, exercise_id: &str) -> rusqlite::Result<usize> {
    conn.execute("DELETE FROM exercise_sets WHERE exercise_id = ?", [exercise_id])
}

fn validate_reps(reps: i32) -> Result<()> {
    if reps <= 0 {
        return Err(AppError::Validation(
            "Reps must be a positive integer".to_string(),
        ));
    }
    Ok(())
}

fn validate_weight(weight: Option<f64>) -> Result<()> {
    match weight {
        Some(w) if !w.is_finite() || w < 0.0 => Err(AppError::Validation(
            "Weight must be a non-negative number".to_string(),
        )),
        _ => Ok(()),
    }
}
