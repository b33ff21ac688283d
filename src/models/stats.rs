use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::WorkoutSessionDetail;

/// Monday-aligned aggregate for the current week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyStats {
    pub week_start: NaiveDate,
    pub workout_count: i64,
    pub total_sets: i64,
    pub completed_sets: i64,
    pub total_duration_seconds: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodayOverview {
    pub date: NaiveDate,
    pub sessions: Vec<WorkoutSessionDetail>,
    pub workout_count: i64,
    pub total_sets: i64,
    pub total_duration_seconds: i64,
}

impl TodayOverview {
    pub fn new(date: NaiveDate, sessions: Vec<WorkoutSessionDetail>) -> Self {
        Self {
            date,
            workout_count: sessions.len() as i64,
            total_sets: sessions.iter().map(|s| s.totals.total_sets).sum(),
            total_duration_seconds: sessions
                .iter()
                .filter_map(|s| s.session.duration_seconds)
                .sum(),
            sessions,
        }
    }
}
