pub mod auth;
pub mod exercises;
pub mod health;
pub mod sets;
pub mod stats;
pub mod timer;
pub mod workouts;
