use chrono::{DateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::FromSqliteRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Lb,
    Kg,
}

impl WeightUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeightUnit::Lb => "lb",
            WeightUnit::Kg => "kg",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "kg" => WeightUnit::Kg,
            _ => WeightUnit::Lb,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseSet {
    pub id: String,
    pub exercise_id: String,
    /// 1-based position among the exercise's sets.
    pub set_number: i32,
    pub reps: i32,
    /// `None` means bodyweight.
    pub weight: Option<f64>,
    pub weight_unit: WeightUnit,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl FromSqliteRow for ExerciseSet {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let unit: String = row.get("weight_unit")?;
        Ok(Self {
            id: row.get("id")?,
            exercise_id: row.get("exercise_id")?,
            set_number: row.get("set_number")?,
            reps: row.get("reps")?,
            weight: row.get("weight")?,
            weight_unit: WeightUnit::parse(&unit),
            completed: row.get("completed")?,
            created_at: row.get("created_at")?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateExerciseSet {
    pub reps: i32,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub weight_unit: Option<WeightUnit>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateExerciseSet {
    pub reps: i32,
    #[serde(default)]
    pub weight: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct SetCompleted {
    pub completed: bool,
}
