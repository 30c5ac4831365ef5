//! Tracking events
//!
//! Append-only log of campaign activity: sends, reminders, and recipient
//! responses. Events are immutable once written; append order is
//! chronological order.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::contact::Contact;

/// What a tracking event records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingAction {
    /// Initial campaign email went out
    EmailSent,
    /// Reminder number `n` went out
    ReminderSent(u32),
    /// Recipient clicked the interested link
    Interested,
    /// Recipient clicked the not-interested link
    NotInterested,
}

impl std::fmt::Display for TrackingAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackingAction::EmailSent => write!(f, "email_sent"),
            TrackingAction::ReminderSent(n) => write!(f, "reminder_{n}_sent"),
            TrackingAction::Interested => write!(f, "interested"),
            TrackingAction::NotInterested => write!(f, "not_interested"),
        }
    }
}

impl std::str::FromStr for TrackingAction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "email_sent" => Ok(TrackingAction::EmailSent),
            "interested" => Ok(TrackingAction::Interested),
            "not_interested" => Ok(TrackingAction::NotInterested),
            other => {
                let ordinal = other
                    .strip_prefix("reminder_")
                    .and_then(|rest| rest.strip_suffix("_sent"))
                    .and_then(|n| n.parse::<u32>().ok());
                match ordinal {
                    Some(n) => Ok(TrackingAction::ReminderSent(n)),
                    None => Err(anyhow::anyhow!("Invalid tracking action: {}", other)),
                }
            }
        }
    }
}

// The log stores actions as plain strings ("email_sent", "reminder_2_sent"),
// so serde goes through Display/FromStr rather than a derived representation.
impl Serialize for TrackingAction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TrackingAction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One immutable entry in the tracking log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingEvent {
    /// Contact the event belongs to
    pub contact_id: u32,

    /// Contact name at the time of the event
    pub contact_name: String,

    /// Contact email at the time of the event
    pub contact_email: String,

    /// What happened
    pub action: TrackingAction,

    /// When it happened
    pub timestamp: DateTime<Utc>,
}

impl TrackingEvent {
    /// Build an event for a contact at an explicit timestamp
    pub fn new(contact: &Contact, action: TrackingAction, timestamp: DateTime<Utc>) -> Self {
        TrackingEvent {
            contact_id: contact.id,
            contact_name: contact.name.clone(),
            contact_email: contact.email.clone(),
            action,
            timestamp,
        }
    }
}
