//! # Persistence Store
//!
//! Contacts and the tracking log live in two whole-file JSON snapshots,
//! shared with the response-endpoint process. All access goes through a
//! single cloneable [`Store`] handle whose mutex serializes every
//! read-modify-write-save cycle, so a reminder firing and a recipient click
//! landing at the same moment cannot clobber each other's save.
//!
//! Every operation re-reads the backing file: the campaign host and the
//! HTTP host are separate processes, and a cached snapshot in one would
//! never observe the other's writes.
//!
//! A missing, empty, or malformed file loads as an empty collection with a
//! warning. Nothing here is fatal.
//!
//! - **Version**: 1.2.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.2.0: Atomic update_contact / update_contacts read-modify-write ops
//! - 1.1.0: Re-read files per operation for cross-process visibility
//! - 1.0.0: Initial JSON snapshot persistence

pub mod contact;
pub mod tracking;

pub use contact::{Contact, ContactStatus};
pub use tracking::{TrackingAction, TrackingEvent};

use anyhow::{Context, Result};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handle to the contact and tracking snapshots
///
/// Cheap to clone; all clones share one lock.
#[derive(Clone)]
pub struct Store {
    inner: Arc<Mutex<StoreInner>>,
}

struct StoreInner {
    contacts_path: PathBuf,
    tracking_path: PathBuf,
}

impl Store {
    /// Create a handle over the two snapshot files. The files do not need
    /// to exist yet; they are created on first save.
    pub fn new(contacts_path: impl Into<PathBuf>, tracking_path: impl Into<PathBuf>) -> Self {
        Store {
            inner: Arc::new(Mutex::new(StoreInner {
                contacts_path: contacts_path.into(),
                tracking_path: tracking_path.into(),
            })),
        }
    }

    /// Snapshot of all contacts
    pub async fn contacts(&self) -> Vec<Contact> {
        let inner = self.inner.lock().await;
        read_collection(&inner.contacts_path)
    }

    /// Snapshot of contacts still awaiting a response
    pub async fn pending_contacts(&self) -> Vec<Contact> {
        let inner = self.inner.lock().await;
        let mut contacts = read_collection::<Contact>(&inner.contacts_path);
        contacts.retain(|c| c.status.is_pending());
        contacts
    }

    /// Snapshot of one contact by id
    pub async fn contact_by_id(&self, id: u32) -> Option<Contact> {
        let inner = self.inner.lock().await;
        read_collection::<Contact>(&inner.contacts_path)
            .into_iter()
            .find(|c| c.id == id)
    }

    /// Snapshot of the full tracking log, in append order
    pub async fn events(&self) -> Vec<TrackingEvent> {
        let inner = self.inner.lock().await;
        read_collection(&inner.tracking_path)
    }

    /// Atomically read-modify-write one contact by id.
    ///
    /// Applies `f`, saves the whole collection, and returns the updated
    /// contact. Returns `Ok(None)` without saving when the id is unknown.
    /// The lock is held for the full load-mutate-save cycle.
    pub async fn update_contact<F>(&self, id: u32, f: F) -> Result<Option<Contact>>
    where
        F: FnOnce(&mut Contact),
    {
        let inner = self.inner.lock().await;
        let mut contacts = read_collection::<Contact>(&inner.contacts_path);
        let updated = match contacts.iter_mut().find(|c| c.id == id) {
            Some(contact) => {
                f(contact);
                contact.clone()
            }
            None => return Ok(None),
        };
        write_collection(&inner.contacts_path, &contacts)?;
        Ok(Some(updated))
    }

    /// Atomically mutate every contact whose id is in `ids`, with one load
    /// and one save for the whole batch. Returns how many were mutated.
    pub async fn update_contacts<F>(&self, ids: &[u32], mut f: F) -> Result<usize>
    where
        F: FnMut(&mut Contact),
    {
        let inner = self.inner.lock().await;
        let mut contacts = read_collection::<Contact>(&inner.contacts_path);
        let mut touched = 0;
        for contact in contacts.iter_mut().filter(|c| ids.contains(&c.id)) {
            f(contact);
            touched += 1;
        }
        write_collection(&inner.contacts_path, &contacts)?;
        Ok(touched)
    }

    /// Append one event to the tracking log and persist it
    pub async fn append_event(&self, event: TrackingEvent) -> Result<()> {
        let inner = self.inner.lock().await;
        let mut events = read_collection::<TrackingEvent>(&inner.tracking_path);
        events.push(event);
        write_collection(&inner.tracking_path, &events)
    }

    /// Replace the whole contact collection (seeding and tests)
    pub async fn replace_contacts(&self, contacts: &[Contact]) -> Result<()> {
        let inner = self.inner.lock().await;
        write_collection(&inner.contacts_path, contacts)
    }
}

/// Read a JSON array snapshot. Missing, empty, or unparseable files load as
/// an empty collection; corruption is surfaced as a warning, not an error.
fn read_collection<T: DeserializeOwned>(path: &Path) -> Vec<T> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("{} not found, treating as empty", path.display());
            return Vec::new();
        }
        Err(e) => {
            warn!("Failed to read {}: {e}", path.display());
            return Vec::new();
        }
    };

    if content.trim().is_empty() {
        return Vec::new();
    }

    match serde_json::from_str(&content) {
        Ok(records) => records,
        Err(e) => {
            warn!(
                "Failed to parse {}, treating as empty: {e}",
                path.display()
            );
            Vec::new()
        }
    }
}

/// Write a JSON array snapshot, pretty-printed to match the seed files.
fn write_collection<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let json = serde_json::to_string_pretty(records)
        .with_context(|| format!("failed to serialize {}", path.display()))?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    fn contact(id: u32, name: &str) -> Contact {
        Contact {
            id,
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            company: None,
            status: ContactStatus::Pending,
            reminder_count: 0,
            sent_at: None,
            last_reminder_sent: None,
            updated_at: None,
            next_reminder_at: None,
        }
    }

    fn store_in(dir: &TempDir) -> Store {
        Store::new(
            dir.path().join("contacts.json"),
            dir.path().join("email_tracking.json"),
        )
    }

    #[tokio::test]
    async fn test_missing_files_load_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.contacts().await.is_empty());
        assert!(store.events().await.is_empty());
    }

    #[tokio::test]
    async fn test_empty_file_loads_as_empty() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("contacts.json"), "   \n").unwrap();
        let store = store_in(&dir);
        assert!(store.contacts().await.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_loads_as_empty() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("contacts.json"), "{not json").unwrap();
        let store = store_in(&dir);
        assert!(store.contacts().await.is_empty());
    }

    #[tokio::test]
    async fn test_round_trip_preserves_order() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let contacts = vec![contact(3, "Carol"), contact(1, "Alice"), contact(2, "Bob")];
        store.replace_contacts(&contacts).await.unwrap();

        // A second handle over the same files sees the identical collection
        let reopened = store_in(&dir);
        assert_eq!(reopened.contacts().await, contacts);
    }

    #[tokio::test]
    async fn test_update_contact_persists_mutation() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store
            .replace_contacts(&[contact(1, "Alice"), contact(2, "Bob")])
            .await
            .unwrap();

        let updated = store
            .update_contact(2, |c| {
                c.status = ContactStatus::Interested;
                c.updated_at = Some(Utc::now());
            })
            .await
            .unwrap()
            .expect("contact 2 exists");
        assert_eq!(updated.status, ContactStatus::Interested);

        let reopened = store_in(&dir);
        let bob = reopened.contact_by_id(2).await.unwrap();
        assert_eq!(bob.status, ContactStatus::Interested);
        assert!(bob.updated_at.is_some());
        // Untouched contact is untouched
        let alice = reopened.contact_by_id(1).await.unwrap();
        assert_eq!(alice.status, ContactStatus::Pending);
    }

    #[tokio::test]
    async fn test_update_contact_unknown_id_is_none() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.replace_contacts(&[contact(1, "Alice")]).await.unwrap();
        let result = store.update_contact(99, |c| c.reminder_count += 1).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_update_contacts_batch() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store
            .replace_contacts(&[contact(1, "Alice"), contact(2, "Bob"), contact(3, "Carol")])
            .await
            .unwrap();

        let touched = store
            .update_contacts(&[1, 3], |c| c.reminder_count += 1)
            .await
            .unwrap();
        assert_eq!(touched, 2);

        let contacts = store.contacts().await;
        assert_eq!(contacts[0].reminder_count, 1);
        assert_eq!(contacts[1].reminder_count, 0);
        assert_eq!(contacts[2].reminder_count, 1);
    }

    #[tokio::test]
    async fn test_pending_contacts_filters_resolved() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let mut resolved = contact(2, "Bob");
        resolved.status = ContactStatus::NotInterested;
        store
            .replace_contacts(&[contact(1, "Alice"), resolved])
            .await
            .unwrap();

        let pending = store.pending_contacts().await;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, 1);
    }

    #[tokio::test]
    async fn test_append_event_is_incremental_and_ordered() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let alice = contact(1, "Alice");
        let now = Utc::now();

        store
            .append_event(TrackingEvent::new(&alice, TrackingAction::EmailSent, now))
            .await
            .unwrap();
        store
            .append_event(TrackingEvent::new(
                &alice,
                TrackingAction::ReminderSent(1),
                now,
            ))
            .await
            .unwrap();

        let events = store_in(&dir).events().await;
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].action, TrackingAction::EmailSent);
        assert_eq!(events[1].action, TrackingAction::ReminderSent(1));
    }
}
