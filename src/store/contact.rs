//! Contact records
//!
//! A contact is a recipient with identity, delivery status, and reminder
//! progress. Contacts are seeded externally and never deleted by the bot;
//! the campaign engine and the response endpoint only mutate them.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.1.0: Added next_reminder_at so pending chains survive a restart
//! - 1.0.0: Initial contact record with status lifecycle

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Delivery status of a contact
///
/// Lifecycle: every contact starts `Pending`; the response endpoint moves it
/// to `Interested` or `NotInterested` on a click, and the reminder chain
/// moves it to `NotInterested` when the cap is reached. Once a contact
/// leaves `Pending` it never goes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactStatus {
    /// Awaiting a response; eligible for sends and reminders
    Pending,
    /// Recipient clicked the interested link
    Interested,
    /// Recipient declined, or the reminder cap auto-resolved the contact
    NotInterested,
}

impl ContactStatus {
    /// Whether the contact is still eligible for sends and reminders
    pub fn is_pending(&self) -> bool {
        matches!(self, ContactStatus::Pending)
    }
}

impl std::fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContactStatus::Pending => write!(f, "pending"),
            ContactStatus::Interested => write!(f, "interested"),
            ContactStatus::NotInterested => write!(f, "not_interested"),
        }
    }
}

impl std::str::FromStr for ContactStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(ContactStatus::Pending),
            "interested" => Ok(ContactStatus::Interested),
            "not_interested" => Ok(ContactStatus::NotInterested),
            _ => Err(anyhow::anyhow!("Invalid contact status: {}", s)),
        }
    }
}

/// A contact record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    /// Unique contact identifier (assigned by whoever seeds the list)
    pub id: u32,

    /// Recipient display name
    pub name: String,

    /// Recipient email address
    pub email: String,

    /// Recipient company, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    /// Current delivery status
    pub status: ContactStatus,

    /// Reminders sent so far; increments by exactly one per reminder
    #[serde(default)]
    pub reminder_count: u32,

    /// When the initial campaign email went out
    #[serde(default)]
    pub sent_at: Option<DateTime<Utc>>,

    /// When the most recent reminder went out
    #[serde(default)]
    pub last_reminder_sent: Option<DateTime<Utc>>,

    /// Last mutation of any kind
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,

    /// Durable fire time of the next scheduled reminder job, so a restart
    /// can re-arm the chain instead of silently dropping it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_reminder_at: Option<DateTime<Utc>>,
}

impl Contact {
    /// Company name for template rendering, with the fallback used in the
    /// email copy when the company is unknown
    pub fn company_or_default(&self) -> &str {
        self.company.as_deref().unwrap_or("your organization")
    }
}
