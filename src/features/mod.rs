//! # Features Layer
//!
//! Campaign sending, reminder scheduling, mail delivery, and stats.

pub mod analytics;
pub mod campaign;
pub mod notifier;
pub mod reminders;

pub use analytics::CampaignStats;
pub use campaign::{CampaignEngine, CampaignSummary};
pub use notifier::{MailError, Mailer, Notifier, OutgoingEmail, SmtpMailer};
pub use reminders::ReminderScheduler;
