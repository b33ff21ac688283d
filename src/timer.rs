//! Elapsed-time tracking for the active workout.
//!
//! `WorkoutTimer` is a plain value owned by the caller and passed into every
//! call; elapsed time is a pure function of that value and "now". Only
//! `TimerController` touches storage, and only when a timer stops.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::UpdateWorkoutSession;
use crate::repositories::WorkoutRepository;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    #[default]
    Idle,
    Running,
    Stopped,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WorkoutTimer {
    #[serde(default)]
    pub status: TimerStatus,
    #[serde(default)]
    pub session_id: Option<String>,
    /// Start of the current running stretch.
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    /// Seconds banked by earlier running stretches.
    #[serde(default)]
    pub accumulated_seconds: i64,
}

/// Final elapsed time of a session, to be written to its `duration_seconds`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedDuration {
    pub session_id: String,
    pub duration_seconds: i64,
}

impl WorkoutTimer {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }

    /// Fails on a negative or overflowing `accumulated_seconds`.
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> Result<i64> {
        if self.accumulated_seconds < 0 {
            return Err(AppError::Validation(
                "Timer accumulated time cannot be negative".to_string(),
            ));
        }

        match (self.status, self.started_at) {
            (TimerStatus::Running, Some(started_at)) => self
                .accumulated_seconds
                .checked_add((now - started_at).num_seconds().max(0))
                .ok_or_else(|| {
                    AppError::Validation("Timer elapsed time is out of range".to_string())
                }),
            _ => Ok(self.accumulated_seconds),
        }
    }

    /// Start timing `session_id`.
    ///
    /// If another session is running it is stopped first and its elapsed time
    /// is returned for persistence; the new session starts at zero. Restarting a
    /// stopped timer on the same session resumes it.
    pub fn start(
        &self,
        session_id: &str,
        now: DateTime<Utc>,
    ) -> Result<(WorkoutTimer, Option<RecordedDuration>)> {
        let same_session = self.session_id.as_deref() == Some(session_id);

        match self.status {
            TimerStatus::Running if same_session => Ok((self.clone(), None)),
            TimerStatus::Running => {
                let (_, previous) = self.stop(now)?;
                Ok((Self::running(session_id, now, 0), Some(previous)))
            }
            TimerStatus::Stopped if same_session => Ok((
                Self::running(session_id, now, self.elapsed_seconds(now)?),
                None,
            )),
            TimerStatus::Stopped | TimerStatus::Idle => {
                Ok((Self::running(session_id, now, 0), None))
            }
        }
    }

    /// Stop the running timer and yield the value to persist.
    pub fn stop(&self, now: DateTime<Utc>) -> Result<(WorkoutTimer, RecordedDuration)> {
        if !self.is_running() {
            return Err(AppError::Validation("Timer is not running".to_string()));
        }
        let session_id = self
            .session_id
            .clone()
            .ok_or_else(|| AppError::Validation("Running timer has no session".to_string()))?;
        if self.started_at.is_none() {
            return Err(AppError::Validation(
                "Running timer has no start time".to_string(),
            ));
        }

        let duration_seconds = self.elapsed_seconds(now)?;
        let stopped = WorkoutTimer {
            status: TimerStatus::Stopped,
            session_id: Some(session_id.clone()),
            started_at: None,
            accumulated_seconds: duration_seconds,
        };
        Ok((
            stopped,
            RecordedDuration {
                session_id,
                duration_seconds,
            },
        ))
    }

    pub fn reset() -> Self {
        Self::idle()
    }

    fn running(session_id: &str, now: DateTime<Utc>, accumulated_seconds: i64) -> Self {
        Self {
            status: TimerStatus::Running,
            session_id: Some(session_id.to_string()),
            started_at: Some(now),
            accumulated_seconds,
        }
    }
}

/// Result of a timer operation: the caller's new timer value and any duration
/// that was written back to a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerTransition {
    pub timer: WorkoutTimer,
    pub persisted: Option<RecordedDuration>,
}

/// Applies timer transitions and writes durations through the session store.
#[derive(Clone)]
pub struct TimerController {
    workout_repo: WorkoutRepository,
}

impl TimerController {
    pub fn new(workout_repo: WorkoutRepository) -> Self {
        Self { workout_repo }
    }

    pub async fn start(
        &self,
        user_id: &str,
        timer: &WorkoutTimer,
        session_id: &str,
        now: DateTime<Utc>,
    ) -> Result<TimerTransition> {
        if self
            .workout_repo
            .find_by_id(user_id, session_id)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound("Workout not found".to_string()));
        }

        let (next, handoff) = timer.start(session_id, now)?;

        let persisted = match handoff {
            Some(previous) => {
                tracing::info!(
                    "Timer hand-off: {} -> {} after {}s",
                    previous.session_id,
                    session_id,
                    previous.duration_seconds
                );
                if self.persist(user_id, &previous).await? {
                    Some(previous)
                } else {
                    tracing::warn!(
                        "Previous workout {} no longer exists; elapsed time dropped",
                        previous.session_id
                    );
                    None
                }
            }
            None => None,
        };

        Ok(TimerTransition {
            timer: next,
            persisted,
        })
    }

    pub async fn stop(
        &self,
        user_id: &str,
        timer: &WorkoutTimer,
        now: DateTime<Utc>,
    ) -> Result<TimerTransition> {
        let (next, recorded) = timer.stop(now)?;

        if !self.persist(user_id, &recorded).await? {
            return Err(AppError::NotFound("Workout not found".to_string()));
        }

        Ok(TimerTransition {
            timer: next,
            persisted: Some(recorded),
        })
    }

    async fn persist(&self, user_id: &str, recorded: &RecordedDuration) -> Result<bool> {
        self.workout_repo
            .update(
                user_id,
                &recorded.session_id,
                UpdateWorkoutSession {
                    duration_seconds: Some(recorded.duration_seconds),
                    ..Default::default()
                },
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, TimeZone};
    use tokio_test::assert_ok;

    use crate::repositories::test_support::{create_test_user, setup_test_db};

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, 18, 0, 0).unwrap() + Duration::seconds(seconds)
    }

    #[test]
    fn test_idle_timer_has_no_elapsed_time() {
        let timer = WorkoutTimer::idle();
        assert_eq!(timer.status, TimerStatus::Idle);
        assert_eq!(timer.elapsed_seconds(at(500)).unwrap(), 0);
    }

    #[test]
    fn test_elapsed_is_pure_function_of_now() {
        let (timer, handoff) = assert_ok!(WorkoutTimer::idle().start("a", at(0)));
        assert!(handoff.is_none());

        assert_eq!(timer.elapsed_seconds(at(0)).unwrap(), 0);
        assert_eq!(timer.elapsed_seconds(at(90)).unwrap(), 90);
        assert_eq!(timer.elapsed_seconds(at(90)).unwrap(), 90);
        // Clock moved backwards.
        assert_eq!(timer.elapsed_seconds(at(-10)).unwrap(), 0);
    }

    #[test]
    fn test_stop_yields_final_seconds() {
        let (timer, _) = WorkoutTimer::idle().start("a", at(0)).unwrap();

        let (stopped, recorded) = timer.stop(at(125)).unwrap();

        assert_eq!(stopped.status, TimerStatus::Stopped);
        assert_eq!(stopped.elapsed_seconds(at(9999)).unwrap(), 125);
        assert_eq!(
            recorded,
            RecordedDuration {
                session_id: "a".to_string(),
                duration_seconds: 125
            }
        );
    }

    #[test]
    fn test_stop_requires_running() {
        assert!(matches!(
            WorkoutTimer::idle().stop(at(1)),
            Err(AppError::Validation(_))
        ));

        let (timer, _) = WorkoutTimer::idle().start("a", at(0)).unwrap();
        let (stopped, _) = timer.stop(at(5)).unwrap();
        assert!(matches!(stopped.stop(at(6)), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_start_same_session_while_running_is_noop() {
        let (timer, _) = WorkoutTimer::idle().start("a", at(0)).unwrap();

        let (again, handoff) = timer.start("a", at(30)).unwrap();

        assert_eq!(again, timer);
        assert!(handoff.is_none());
    }

    #[test]
    fn test_start_other_session_hands_off() {
        let (timer, _) = WorkoutTimer::idle().start("a", at(0)).unwrap();

        let (next, handoff) = timer.start("b", at(300)).unwrap();

        assert_eq!(
            handoff,
            Some(RecordedDuration {
                session_id: "a".to_string(),
                duration_seconds: 300
            })
        );
        assert_eq!(next.session_id.as_deref(), Some("b"));
        assert!(next.is_running());
        assert_eq!(next.elapsed_seconds(at(300)).unwrap(), 0);
    }

    #[test]
    fn test_restart_stopped_session_resumes() {
        let (timer, _) = WorkoutTimer::idle().start("a", at(0)).unwrap();
        let (stopped, _) = timer.stop(at(60)).unwrap();

        let (resumed, handoff) = stopped.start("a", at(100)).unwrap();
        assert!(handoff.is_none());
        assert_eq!(resumed.elapsed_seconds(at(110)).unwrap(), 70);

        let (fresh, _) = stopped.start("b", at(100)).unwrap();
        assert_eq!(fresh.elapsed_seconds(at(110)).unwrap(), 10);
    }

    #[test]
    fn test_reset_clears_everything() {
        let (timer, _) = WorkoutTimer::idle().start("a", at(0)).unwrap();
        let (stopped, _) = timer.stop(at(60)).unwrap();
        assert_eq!(stopped.accumulated_seconds, 60);

        let reset = WorkoutTimer::reset();
        assert_eq!(reset, WorkoutTimer::idle());
        assert_eq!(reset.elapsed_seconds(at(100)).unwrap(), 0);
    }

    #[test]
    fn test_overflowing_accumulated_time_is_rejected() {
        let timer = WorkoutTimer {
            status: TimerStatus::Running,
            session_id: Some("a".to_string()),
            started_at: Some(at(0)),
            accumulated_seconds: i64::MAX,
        };

        assert!(matches!(
            timer.elapsed_seconds(at(10)),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(timer.stop(at(10)), Err(AppError::Validation(_))));
        assert!(matches!(timer.start("b", at(10)), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_negative_accumulated_time_is_rejected() {
        let timer = WorkoutTimer {
            status: TimerStatus::Stopped,
            session_id: Some("a".to_string()),
            started_at: None,
            accumulated_seconds: -5,
        };

        assert!(matches!(
            timer.elapsed_seconds(at(10)),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(timer.start("a", at(10)), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_inconsistent_running_state_is_rejected() {
        let broken = WorkoutTimer {
            status: TimerStatus::Running,
            session_id: None,
            started_at: Some(at(0)),
            accumulated_seconds: 0,
        };
        assert!(matches!(broken.stop(at(10)), Err(AppError::Validation(_))));
        assert!(matches!(
            broken.start("b", at(10)),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_timer_serde_shape() {
        let timer: WorkoutTimer = serde_json::from_str(r#"{"status":"idle"}"#).unwrap();
        assert_eq!(timer, WorkoutTimer::idle());

        let json = serde_json::to_value(WorkoutTimer::idle().start("a", at(0)).unwrap().0).unwrap();
        assert_eq!(json["status"], "running");
        assert_eq!(json["session_id"], "a");
    }

    async fn seed_two_sessions(repo: &WorkoutRepository) -> (String, String) {
        let day = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let a = repo.create("user1", day, "Session A", None).await.unwrap();
        let b = repo.create("user1", day, "Session B", None).await.unwrap();
        (a.id, b.id)
    }

    #[tokio::test]
    async fn test_controller_handoff_persists_previous_session() {
        let pool = setup_test_db();
        create_test_user(&pool, "user1");
        let repo = WorkoutRepository::new(pool);
        let controller = TimerController::new(repo.clone());
        let (a, b) = seed_two_sessions(&repo).await;

        let started = controller
            .start("user1", &WorkoutTimer::idle(), &a, at(0))
            .await
            .unwrap();
        assert!(started.persisted.is_none());
        assert_eq!(
            repo.find_by_id("user1", &a).await.unwrap().unwrap().duration_seconds,
            None
        );

        let switched = controller
            .start("user1", &started.timer, &b, at(1800))
            .await
            .unwrap();

        assert_eq!(
            repo.find_by_id("user1", &a).await.unwrap().unwrap().duration_seconds,
            Some(1800)
        );
        assert_eq!(switched.persisted.unwrap().session_id, a);
        assert_eq!(switched.timer.session_id.as_deref(), Some(b.as_str()));
        assert_eq!(switched.timer.elapsed_seconds(at(1800)).unwrap(), 0);
        assert_eq!(
            repo.find_by_id("user1", &b).await.unwrap().unwrap().duration_seconds,
            None
        );
    }

    #[tokio::test]
    async fn test_controller_stop_writes_duration() {
        let pool = setup_test_db();
        create_test_user(&pool, "user1");
        let repo = WorkoutRepository::new(pool);
        let controller = TimerController::new(repo.clone());
        let (a, _) = seed_two_sessions(&repo).await;

        let started = controller
            .start("user1", &WorkoutTimer::idle(), &a, at(0))
            .await
            .unwrap();
        let stopped = controller
            .stop("user1", &started.timer, at(2700))
            .await
            .unwrap();

        assert_eq!(stopped.timer.status, TimerStatus::Stopped);
        assert_eq!(
            repo.find_by_id("user1", &a).await.unwrap().unwrap().duration_seconds,
            Some(2700)
        );
    }

    #[tokio::test]
    async fn test_controller_rejects_unknown_session() {
        let pool = setup_test_db();
        create_test_user(&pool, "user1");
        let repo = WorkoutRepository::new(pool);
        let controller = TimerController::new(repo);

        let result = controller
            .start("user1", &WorkoutTimer::idle(), "nonexistent", at(0))
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
