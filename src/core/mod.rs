//! # Core Module
//!
//! Configuration and email template rendering shared by both binaries.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

pub mod config;
pub mod template;

// Re-export commonly used items
pub use config::{Config, DEFAULT_MAX_REMINDERS, DEFAULT_REMINDER_INTERVAL_MINUTES};
pub use template::{EmailTemplate, TemplateVars};
