use chrono::{Datelike, Days, NaiveDate};

use super::workout_repo::load_details;
use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{FromSqliteRow, TodayOverview, WeeklyStats, WorkoutSession};

/// Most recent Monday on or before `today`.
pub fn week_start(today: NaiveDate) -> Result<NaiveDate> {
    let offset = Days::new(u64::from(today.weekday().num_days_from_monday()));
    today
        .checked_sub_days(offset)
        .ok_or_else(|| AppError::Validation(format!("Date {} is out of range", today)))
}

/// Read-time aggregates over the session tree. Nothing here is stored; every
/// count is recomputed from the child rows.
#[derive(Clone)]
pub struct StatsRepository {
    pool: DbPool,
}

impl StatsRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn weekly_stats(&self, user_id: &str, today: NaiveDate) -> Result<WeeklyStats> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        let week_start = week_start(today)?;
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;

            let (workout_count, total_duration_seconds): (i64, i64) = conn.query_row(
                "SELECT COUNT(*), COALESCE(SUM(duration_seconds), 0)
                 FROM workout_sessions
                 WHERE user_id = ? AND workout_date >= ?",
                rusqlite::params![user_id, week_start],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )?;

            let (total_sets, completed_sets): (i64, i64) = conn.query_row(
                "SELECT COUNT(es.id), COALESCE(SUM(es.completed), 0)
                 FROM exercise_sets es
                 JOIN session_exercises se ON se.id = es.exercise_id
                 JOIN workout_sessions ws ON ws.id = se.session_id
                 WHERE ws.user_id = ? AND ws.workout_date >= ?",
                rusqlite::params![user_id, week_start],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )?;

            Ok(WeeklyStats {
                week_start,
                workout_count,
                total_sets,
                completed_sets,
                total_duration_seconds,
            })
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Today's sessions as full trees, with day totals.
    pub async fn today_overview(&self, user_id: &str, today: NaiveDate) -> Result<TodayOverview> {
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
                .query_map(rusqlite::params![user_id, today], WorkoutSession::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            Ok(TodayOverview::new(today, load_details(&conn, sessions)?))
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}
