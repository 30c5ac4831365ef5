//! # Campaign Feature
//!
//! The campaign engine drives the whole contact lifecycle: it sends the
//! initial batch to pending contacts, chains timed follow-up reminders per
//! contact, and auto-resolves contacts that stay silent past the cap.
//!
//! Reminder cadence is measured from each contact's last send, never from
//! campaign start. The only guard against a reminder acting twice is the
//! reload-then-check-status step at the top of [`CampaignEngine::fire_reminder`]:
//! a contact resolved while a timer is in flight turns that firing into a
//! no-op.
//!
//! - **Version**: 1.2.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.2.0: Re-arm reminder chains from durable next-fire timestamps on startup
//! - 1.1.0: Follow-up job scheduled past the cap so auto-resolution fires
//! - 1.0.0: Initial batch sending and reminder chain

use anyhow::Result;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use log::{error, info};
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::time::sleep;

use crate::features::notifier::Notifier;
use crate::features::reminders::ReminderScheduler;
use crate::store::{ContactStatus, Store, TrackingAction, TrackingEvent};

/// Pause between consecutive sends so the relay doesn't rate-limit us
const SEND_PAUSE: Duration = Duration::from_secs(1);

/// Outcome counts for one campaign pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CampaignSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub total: usize,
}

/// Sends campaigns and drives per-contact reminder chains
pub struct CampaignEngine {
    store: Store,
    notifier: Notifier,
    scheduler: ReminderScheduler,
    max_reminders: u32,
    // Handle the engine passes into its own reminder jobs
    weak_self: Weak<CampaignEngine>,
}

impl CampaignEngine {
    pub fn new(
        store: Store,
        notifier: Notifier,
        scheduler: ReminderScheduler,
        max_reminders: u32,
    ) -> Arc<Self> {
        Arc::new_cyclic(|weak_self| CampaignEngine {
            store,
            notifier,
            scheduler,
            max_reminders,
            weak_self: weak_self.clone(),
        })
    }

    /// Send the initial email to every pending contact.
    ///
    /// Contacts whose send succeeds are stamped, get an `email_sent`
    /// tracking event, and have reminder #1 scheduled `interval_minutes`
    /// from their send time. Failed sends leave the contact unmodified;
    /// there is no retry within a pass. The contact collection is persisted
    /// once after the loop, tracking incrementally per send.
    pub async fn run_campaign(&self, interval_minutes: u64) -> Result<CampaignSummary> {
        let pending = self.store.pending_contacts().await;
        if pending.is_empty() {
            info!("No pending contacts to send emails to");
            return Ok(CampaignSummary::default());
        }

        info!(
            "📧 Starting email campaign for {} contact(s), reminder interval {interval_minutes} min",
            pending.len()
        );

        let mut sent_at: HashMap<u32, DateTime<Utc>> = HashMap::new();
        let mut failed = 0usize;

        for (i, contact) in pending.iter().enumerate() {
            match self.notifier.send_initial(contact).await {
                Ok(()) => {
                    let now = Utc::now();
                    info!("✅ Email sent to {} ({})", contact.name, contact.email);
                    if let Err(e) = self
                        .store
                        .append_event(TrackingEvent::new(contact, TrackingAction::EmailSent, now))
                        .await
                    {
                        error!("Failed to record email_sent for contact {}: {e}", contact.id);
                    }
                    sent_at.insert(contact.id, now);
                }
                Err(e) => {
                    error!(
                        "❌ Failed to send email to {} ({}): {e}",
                        contact.name, contact.email
                    );
                    failed += 1;
                }
            }

            if i + 1 < pending.len() {
                sleep(SEND_PAUSE).await;
            }
        }

        let interval = ChronoDuration::minutes(interval_minutes as i64);
        let ids: Vec<u32> = sent_at.keys().copied().collect();
        self.store
            .update_contacts(&ids, |c| {
                if let Some(&t) = sent_at.get(&c.id) {
                    c.sent_at = Some(t);
                    c.updated_at = Some(t);
                    c.reminder_count = 0;
                    c.last_reminder_sent = None;
                    c.next_reminder_at = Some(t + interval);
                }
            })
            .await?;

        for (&id, &t) in &sent_at {
            self.schedule_reminder(id, 1, t + interval, interval_minutes);
        }

        let summary = CampaignSummary {
            succeeded: sent_at.len(),
            failed,
            total: pending.len(),
        };
        info!(
            "📊 Campaign summary: {} sent, {} failed, {} total",
            summary.succeeded, summary.failed, summary.total
        );
        Ok(summary)
    }

    /// One firing of a contact's reminder chain.
    ///
    /// Reloads the contact first: a missing or already-resolved contact
    /// makes this a no-op, which is the only cancellation mechanism for
    /// in-flight timers. A fire that finds the cap already reached
    /// auto-resolves the contact to not_interested instead of sending.
    /// A failed send ends the chain; nothing is rescheduled.
    pub async fn fire_reminder(&self, contact_id: u32, interval_minutes: u64) {
        let Some(contact) = self.store.contact_by_id(contact_id).await else {
            info!("⚠️ Contact {contact_id} not found, skipping reminder");
            return;
        };
        if !contact.status.is_pending() {
            info!(
                "Contact {} already {}, reminder chain ends",
                contact.name, contact.status
            );
            return;
        }

        if contact.reminder_count >= self.max_reminders {
            let now = Utc::now();
            let resolved = self
                .store
                .update_contact(contact_id, |c| {
                    c.status = ContactStatus::NotInterested;
                    c.updated_at = Some(now);
                    c.next_reminder_at = None;
                })
                .await;
            match resolved {
                Ok(_) => info!(
                    "🚫 Max reminders ({}) reached for {} - marked as not_interested",
                    self.max_reminders, contact.name
                ),
                Err(e) => error!("Failed to auto-resolve contact {contact_id}: {e}"),
            }
            return;
        }

        let ordinal = contact.reminder_count + 1;
        match self.notifier.send_reminder(&contact, ordinal).await {
            Ok(()) => {
                let now = Utc::now();
                let next_at = now + ChronoDuration::minutes(interval_minutes as i64);
                if let Err(e) = self
                    .store
                    .update_contact(contact_id, |c| {
                        c.reminder_count += 1;
                        c.last_reminder_sent = Some(now);
                        c.updated_at = Some(now);
                        c.next_reminder_at = Some(next_at);
                    })
                    .await
                {
                    error!("Failed to persist reminder state for contact {contact_id}: {e}");
                }
                if let Err(e) = self
                    .store
                    .append_event(TrackingEvent::new(
                        &contact,
                        TrackingAction::ReminderSent(ordinal),
                        now,
                    ))
                    .await
                {
                    error!("Failed to record reminder event for contact {contact_id}: {e}");
                }
                info!("🔔 Reminder {ordinal} sent to {} ({})", contact.name, contact.email);

                // Scheduled even when the new count has reached the cap;
                // that firing performs the auto-resolution above.
                self.schedule_reminder(contact_id, ordinal + 1, next_at, interval_minutes);
                info!(
                    "⏰ Next reminder for {} scheduled at {} (in {interval_minutes} min)",
                    contact.name,
                    next_at.format("%H:%M:%S")
                );
            }
            Err(e) => {
                error!(
                    "❌ Failed to send reminder to {} ({}): {e} - chain ends",
                    contact.name, contact.email
                );
                if let Err(e) = self
                    .store
                    .update_contact(contact_id, |c| c.next_reminder_at = None)
                    .await
                {
                    error!("Failed to clear next reminder for contact {contact_id}: {e}");
                }
            }
        }
    }

    /// Re-arm reminder jobs from the durable next-fire timestamps.
    ///
    /// Run at startup: pending contacts with a stored `next_reminder_at`
    /// get their job back, clamped to now if the fire time already passed
    /// while the process was down. Returns how many were re-armed.
    pub async fn recover_reminders(&self, interval_minutes: u64) -> usize {
        let now = Utc::now();
        let mut recovered = 0;
        for contact in self.store.contacts().await {
            if !contact.status.is_pending() {
                continue;
            }
            let Some(next_at) = contact.next_reminder_at else {
                continue;
            };
            self.schedule_reminder(
                contact.id,
                contact.reminder_count + 1,
                next_at.max(now),
                interval_minutes,
            );
            recovered += 1;
        }
        if recovered > 0 {
            info!("⏰ Re-armed {recovered} reminder job(s) from the store");
        }
        recovered
    }

    fn schedule_reminder(
        &self,
        contact_id: u32,
        ordinal: u32,
        fire_at: DateTime<Utc>,
        interval_minutes: u64,
    ) {
        let engine = Weak::clone(&self.weak_self);
        let job_id = format!("reminder_{contact_id}_{ordinal}");
        self.scheduler.schedule_at(fire_at, &job_id, async move {
            // The engine may be gone if the host is shutting down
            if let Some(engine) = engine.upgrade() {
                engine.fire_reminder(contact_id, interval_minutes).await;
            }
        });
    }
}
