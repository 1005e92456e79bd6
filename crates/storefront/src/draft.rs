//! Contact form draft auto-save.
//!
//! Drafts are overwritten on every (debounced) save and expire after a
//! freshness window, 24 hours by default.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::contact::ContactForm;
use crate::storage::{KeyValueStore, StorageError, keys, read_json, write_json};

/// Default freshness window for saved drafts.
pub const DEFAULT_DRAFT_TTL: TimeDelta = TimeDelta::hours(24);

/// A saved, not-yet-submitted contact form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDraft {
    #[serde(flatten)]
    pub form: ContactForm,
    pub saved_at: DateTime<Utc>,
}

/// Persisted draft of the contact form.
pub struct DraftStore {
    storage: Arc<dyn KeyValueStore>,
    ttl: TimeDelta,
}

impl std::fmt::Debug for DraftStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DraftStore")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl DraftStore {
    /// Create a draft store with the given freshness window.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>, ttl: TimeDelta) -> Self {
        Self { storage, ttl }
    }

    /// Save `form` stamped with the current time, replacing any prior draft.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the draft cannot be written.
    pub fn save(&self, form: &ContactForm) -> Result<ContactDraft, StorageError> {
        self.save_at(form, Utc::now())
    }

    /// Save `form` stamped with `now`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the draft cannot be written.
    #[instrument(skip_all)]
    pub fn save_at(
        &self,
        form: &ContactForm,
        now: DateTime<Utc>,
    ) -> Result<ContactDraft, StorageError> {
        let draft = ContactDraft {
            form: form.clone(),
            saved_at: now,
        };
        write_json(self.storage.as_ref(), keys::CONTACT_DRAFT, &draft)?;
        tracing::debug!(saved_at = %now, "Contact draft saved");
        Ok(draft)
    }

    /// Load the saved draft if it is still fresh.
    #[must_use]
    pub fn load(&self) -> Option<ContactDraft> {
        self.load_at(Utc::now())
    }

    /// Load the saved draft as seen at `now`.
    ///
    /// A draft older than the freshness window is deleted and `None` is
    /// returned. Unreadable drafts are reported as absent.
    #[must_use]
    pub fn load_at(&self, now: DateTime<Utc>) -> Option<ContactDraft> {
        let draft: ContactDraft = read_json(self.storage.as_ref(), keys::CONTACT_DRAFT)?;

        if now.signed_duration_since(draft.saved_at) > self.ttl {
            tracing::info!(saved_at = %draft.saved_at, "Discarding expired contact draft");
            if let Err(e) = self.storage.remove(keys::CONTACT_DRAFT) {
                tracing::warn!(error = %e, "Failed to delete expired contact draft");
            }
            return None;
        }

        Some(draft)
    }

    /// Delete the saved draft.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the draft cannot be deleted.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove(keys::CONTACT_DRAFT)?;
        tracing::debug!("Contact draft cleared");
        Ok(())
    }
}
