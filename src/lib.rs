// Core layer - configuration and template rendering
pub mod core;

// Persistence layer - contact and tracking snapshots
pub mod store;

// Features layer - campaign engine, reminders, notifier, analytics
pub mod features;

// HTTP layer - recipient response endpoint
pub mod http;

// Re-export core config for convenience
pub use crate::core::Config;

// Re-export feature items for convenience
pub use features::{
    // Analytics
    CampaignStats,
    // Campaign
    CampaignEngine, CampaignSummary,
    // Notifier
    MailError, Mailer, Notifier, OutgoingEmail, SmtpMailer,
    // Reminders
    ReminderScheduler,
};

// Re-export store items
pub use store::{Contact, ContactStatus, Store, TrackingAction, TrackingEvent};
