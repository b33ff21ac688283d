use chrono::{DateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::FromSqliteRow;

/// Internal user profile, keyed separately from the external identity (`auth_id`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub auth_id: String,
    pub display_name: Option<String>,
    /// Denormalized count of the user's workout sessions, recomputed from source rows.
    pub workout_counter: i64,
    pub created_at: DateTime<Utc>,
}

impl FromSqliteRow for User {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            auth_id: row.get("auth_id")?,
            display_name: row.get("display_name")?,
            workout_counter: row.get("workout_counter")?,
            created_at: row.get("created_at")?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ResolveIdentity {
    pub display_name: Option<String>,
}
