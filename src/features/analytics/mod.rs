//! # Analytics Feature
//!
//! Campaign statistics aggregated from the contact collection and the
//! tracking log, served by the `/stats` endpoint.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use serde::Serialize;

use crate::store::{Contact, ContactStatus, TrackingEvent};

/// How many recent responses `/stats` reports
const RECENT_RESPONSES: usize = 10;

/// Aggregate campaign statistics
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CampaignStats {
    pub total_contacts: usize,
    pub interested: usize,
    pub not_interested: usize,
    pub pending: usize,
    /// Share of contacts that responded either way, formatted like "42.9%"
    pub response_rate: String,
    /// Last entries of the tracking log, oldest first
    pub recent_responses: Vec<TrackingEvent>,
}

impl CampaignStats {
    /// Aggregate over a contact snapshot and the tracking log
    pub fn collect(contacts: &[Contact], events: &[TrackingEvent]) -> Self {
        let total = contacts.len();
        let interested = count_status(contacts, ContactStatus::Interested);
        let not_interested = count_status(contacts, ContactStatus::NotInterested);
        let pending = count_status(contacts, ContactStatus::Pending);

        let response_rate = if total > 0 {
            let responded = (interested + not_interested) as f64;
            format!("{:.1}%", responded / total as f64 * 100.0)
        } else {
            "0%".to_string()
        };

        let recent_responses = events
            .iter()
            .rev()
            .take(RECENT_RESPONSES)
            .rev()
            .cloned()
            .collect();

        CampaignStats {
            total_contacts: total,
            interested,
            not_interested,
            pending,
            response_rate,
            recent_responses,
        }
    }
}

fn count_status(contacts: &[Contact], status: ContactStatus) -> usize {
    contacts.iter().filter(|c| c.status == status).count()
}
