//! Rebuilds nested session trees from flat exercise and set rows.
//!
//! Rows are kept in maps keyed by id and the parent -> children index is
//! rebuilt on every read, so nothing is nested during loading.

use std::collections::HashMap;

use super::{
    ExerciseSet, SessionExercise, SessionExerciseDetail, WorkoutSession, WorkoutSessionDetail,
};

#[derive(Debug, Default)]
pub struct WorkoutArena {
    exercises: HashMap<String, SessionExercise>,
    sets: HashMap<String, ExerciseSet>,
}

impl WorkoutArena {
    pub fn new(exercises: Vec<SessionExercise>, sets: Vec<ExerciseSet>) -> Self {
        Self {
            exercises: exercises.into_iter().map(|e| (e.id.clone(), e)).collect(),
            sets: sets.into_iter().map(|s| (s.id.clone(), s)).collect(),
        }
    }

    /// Assemble one detail per session, in the order the sessions are given.
    ///
    /// Sets whose exercise is not in the arena, and exercises whose session is
    /// not among `sessions`, are dropped.
    pub fn into_details(mut self, sessions: Vec<WorkoutSession>) -> Vec<WorkoutSessionDetail> {
        let mut exercises_by_session = self.exercise_index();
        let mut sets_by_exercise = self.set_index();

        sessions
            .into_iter()
            .map(|session| {
                let exercise_ids = exercises_by_session.remove(&session.id).unwrap_or_default();
                let exercises = exercise_ids
                    .into_iter()
                    .filter_map(|id| self.exercises.remove(&id))
                    .map(|exercise| {
                        let sets = sets_by_exercise
                            .remove(&exercise.id)
                            .unwrap_or_default()
                            .into_iter()
                            .filter_map(|id| self.sets.remove(&id))
                            .collect();
                        SessionExerciseDetail { exercise, sets }
                    })
                    .collect();
                WorkoutSessionDetail::new(session, exercises)
            })
            .collect()
    }

    fn exercise_index(&self) -> HashMap<String, Vec<String>> {
        let mut index: HashMap<String, Vec<&SessionExercise>> = HashMap::new();
        for exercise in self.exercises.values() {
            index
                .entry(exercise.session_id.clone())
                .or_default()
                .push(exercise);
        }
        index
            .into_iter()
            .map(|(session_id, mut children)| {
                children.sort_by(|a, b| {
                    (a.sort_order, a.created_at, &a.id).cmp(&(b.sort_order, b.created_at, &b.id))
                });
                (session_id, children.into_iter().map(|e| e.id.clone()).collect())
            })
            .collect()
    }

    fn set_index(&self) -> HashMap<String, Vec<String>> {
        let mut index: HashMap<String, Vec<&ExerciseSet>> = HashMap::new();
        for set in self.sets.values() {
            index.entry(set.exercise_id.clone()).or_default().push(set);
        }
        index
            .into_iter()
            .map(|(exercise_id, mut children)| {
                children.sort_by(|a, b| {
                    (a.set_number, a.created_at, &a.id).cmp(&(b.set_number, b.created_at, &b.id))
                });
                (exercise_id, children.into_iter().map(|s| s.id.clone()).collect())
            })
            .collect()
    }
}
