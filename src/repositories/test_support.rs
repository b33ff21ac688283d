//! Fixtures shared by the repository unit tests.

use std::path::PathBuf;

use chrono::NaiveDate;

use super::{ExerciseRepository, WorkoutRepository};
use crate::db::{create_memory_pool, create_pool, DbPool};
use crate::migrations::run_migrations_for_tests;

pub fn setup_test_db() -> DbPool {
    let pool = create_memory_pool().expect("Failed to create test database");
    run_migrations_for_tests(&pool).expect("Failed to run migrations");
    pool
}

/// File-backed database with a multi-connection pool, for tests that need
/// real writer contention. The caller removes the file.
pub fn setup_file_db() -> (DbPool, PathBuf) {
    let path = std::env::temp_dir().join(format!("setlog-test-{}.db", uuid::Uuid::new_v4()));
    let pool = create_pool(path.to_str().unwrap()).expect("Failed to create test database");
    run_migrations_for_tests(&pool).expect("Failed to run migrations");
    (pool, path)
}

pub fn create_test_user(pool: &DbPool, user_id: &str) {
    let conn = pool.get().unwrap();
    conn.execute(
        "INSERT OR IGNORE INTO users (id, auth_id, workout_counter, created_at)
         VALUES (?, ?, 0, datetime('now'))",
        rusqlite::params![user_id, format!("auth|{}", user_id)],
    )
    .unwrap();
}

pub async fn seed_session(pool: &DbPool, user_id: &str) -> String {
    create_test_user(pool, user_id);
    WorkoutRepository::new(pool.clone())
        .create(
            user_id,
            NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            "Leg Day",
            None,
        )
        .await
        .unwrap()
        .id
}

pub async fn seed_exercise(pool: &DbPool, user_id: &str) -> String {
    let session_id = seed_session(pool, user_id).await;
    ExerciseRepository::new(pool.clone())
        .add(user_id, &session_id, "Squats", 0)
        .await
        .unwrap()
        .id
}

pub fn count_rows(pool: &DbPool, table: &str, column: &str, value: &str) -> i64 {
    let conn = pool.get().unwrap();
    conn.query_row(
        &format!("SELECT COUNT(*) FROM {} WHERE {} = ?", table, column),
        [value],
        |row| row.get(0),
    )
    .unwrap()
}
