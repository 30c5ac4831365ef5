//! Environment-based configuration
//!
//! All configuration comes from the process environment (a `.env` file is
//! loaded by the binaries before this runs). Missing required values are
//! the only fatal startup condition in the system.
//!
//! | Variable | Required | Description |
//! |----------|----------|-------------|
//! | `SMTP_SERVER` | Yes | SMTP relay hostname |
//! | `SMTP_PORT` | Yes | SMTP relay port |
//! | `SMTP_USERNAME` | Yes | SMTP auth username |
//! | `SMTP_PASSWORD` | Yes | SMTP auth password |
//! | `SENDER_EMAIL` | Yes | From address |
//! | `SENDER_NAME` | Yes | From display name |
//! | `COMPANY_NAME` | Yes | Company named in subject and template |
//! | `PRODUCT_NAME` | Yes | Product named in the template |
//! | `CALENDLY_LINK` | Yes | External scheduling link for interested clicks |
//! | `BASE_URL` | No | Public base for tracking links (default `http://localhost:8000`) |
//! | `APP_PORT` | No | Response endpoint port (default 8000) |
//! | `LOG_LEVEL` | No | env_logger filter (default `info`) |
//! | `CONTACTS_FILE` | No | Contact snapshot path (default `contacts.json`) |
//! | `TRACKING_FILE` | No | Tracking log path (default `email_tracking.json`) |
//! | `TEMPLATE_FILE` | No | HTML template path (default `templates/outreach.html`) |
//! | `REMINDER_INTERVAL_MINUTES` | No | Minutes between reminders (default 1) |
//! | `MAX_REMINDERS` | No | Reminder cap per contact (default 3) |

use anyhow::{anyhow, Context, Result};
use std::env;

/// Default minutes between reminders when neither the environment nor the
/// CLI overrides it
pub const DEFAULT_REMINDER_INTERVAL_MINUTES: u64 = 1;

/// Default maximum reminders per contact before auto-resolution
pub const DEFAULT_MAX_REMINDERS: u32 = 3;

/// Runtime configuration for both binaries
#[derive(Debug, Clone)]
pub struct Config {
    pub smtp_server: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub sender_email: String,
    pub sender_name: String,
    pub company_name: String,
    pub product_name: String,
    pub base_url: String,
    pub calendly_link: String,
    pub app_port: u16,
    pub log_level: String,
    pub contacts_file: String,
    pub tracking_file: String,
    pub template_file: String,
    pub reminder_interval_minutes: u64,
    pub max_reminders: u32,
}

impl Config {
    /// Build the configuration from the environment.
    ///
    /// Errors on a missing required variable or an unparseable numeric one.
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            smtp_server: required("SMTP_SERVER")?,
            smtp_port: required("SMTP_PORT")?
                .parse()
                .context("SMTP_PORT must be a port number")?,
            smtp_username: required("SMTP_USERNAME")?,
            smtp_password: required("SMTP_PASSWORD")?,
            sender_email: required("SENDER_EMAIL")?,
            sender_name: required("SENDER_NAME")?,
            company_name: required("COMPANY_NAME")?,
            product_name: required("PRODUCT_NAME")?,
            base_url: optional("BASE_URL", "http://localhost:8000"),
            calendly_link: required("CALENDLY_LINK")?,
            app_port: optional("APP_PORT", "8000")
                .parse()
                .context("APP_PORT must be a port number")?,
            log_level: optional("LOG_LEVEL", "info"),
            contacts_file: optional("CONTACTS_FILE", "contacts.json"),
            tracking_file: optional("TRACKING_FILE", "email_tracking.json"),
            template_file: optional("TEMPLATE_FILE", "templates/outreach.html"),
            reminder_interval_minutes: optional(
                "REMINDER_INTERVAL_MINUTES",
                &DEFAULT_REMINDER_INTERVAL_MINUTES.to_string(),
            )
            .parse()
            .context("REMINDER_INTERVAL_MINUTES must be a number of minutes")?,
            max_reminders: optional("MAX_REMINDERS", &DEFAULT_MAX_REMINDERS.to_string())
                .parse()
                .context("MAX_REMINDERS must be a number")?,
        })
    }
}

fn required(name: &str) -> Result<String> {
    env::var(name).map_err(|_| anyhow!("missing required environment variable {name}"))
}

fn optional(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test uses variable names nobody else touches, so tests can run
    // in parallel without tripping over shared process state.

    #[test]
    fn test_required_missing_is_an_error() {
        let err = required("OUTREACH_TEST_NEVER_SET").unwrap_err();
        assert!(err.to_string().contains("OUTREACH_TEST_NEVER_SET"));
    }

    #[test]
    fn test_optional_falls_back_to_default() {
        assert_eq!(optional("OUTREACH_TEST_ALSO_NEVER_SET", "info"), "info");
    }

    #[test]
    fn test_optional_reads_value_when_present() {
        env::set_var("OUTREACH_TEST_OPTIONAL_PRESENT", "debug");
        assert_eq!(optional("OUTREACH_TEST_OPTIONAL_PRESENT", "info"), "debug");
        env::remove_var("OUTREACH_TEST_OPTIONAL_PRESENT");
    }
}
