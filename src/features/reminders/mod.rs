//! # Reminders Feature
//!
//! Timer-driven follow-up scheduling for the campaign engine.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

pub mod scheduler;

pub use scheduler::{next_occurrence, parse_weekday, ReminderScheduler};
