use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{FromSqliteRow, User};

/// Maps external identities onto internal user profiles.
#[derive(Clone)]
pub struct UserRepository {
    pool: DbPool,
}

impl UserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        let pool = self.pool.clone();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM users WHERE id = ?")?;
            let result = stmt.query_row([&id], User::from_row).optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_by_auth_id(&self, auth_id: &str) -> Result<Option<User>> {
        let pool = self.pool.clone();
        let auth_id = auth_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM users WHERE auth_id = ?")?;
            let result = stmt.query_row([&auth_id], User::from_row).optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Return the user for `auth_id`, creating the profile on first sight.
    pub async fn resolve_identity(
        &self,
        auth_id: &str,
        display_name: Option<&str>,
    ) -> Result<User> {
        let auth_id = auth_id.trim().to_string();
        if auth_id.is_empty() {
            return Err(AppError::AuthenticationMissing);
        }

        let pool = self.pool.clone();
        let display_name = display_name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            conn.execute(
                "INSERT INTO users (id, auth_id, display_name, workout_counter, created_at)
                 VALUES (?, ?, ?, 0, ?)
                 ON CONFLICT(auth_id) DO NOTHING",
                rusqlite::params![Uuid::new_v4().to_string(), auth_id, display_name, Utc::now()],
            )?;
            let user = conn.query_row(
                "SELECT * FROM users WHERE auth_id = ?",
                [&auth_id],
                User::from_row,
            )?;
            Ok(user)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Recompute the denormalized workout counter from the session rows.
    pub async fn refresh_workout_counter(&self, id: &str) -> Result<i64> {
        let pool = self.pool.clone();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            Ok(recompute_workout_counter(&conn, &id)?)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}

/// Idempotent: the counter is derived from `workout_sessions`, never incremented.
pub(crate) fn recompute_workout_counter(conn: &Connection, user_id: &str) -> rusqlite::Result<i64> {
    conn.execute(
        "UPDATE users
         SET workout_counter = (SELECT COUNT(*) FROM workout_sessions WHERE user_id = ?1)
         WHERE id = ?1",
        [user_id],
    )?;
    conn.query_row(
        "SELECT workout_counter FROM users WHERE id = ?",
        [user_id],
        |row| row.get(0),
    )
}
