//! Contact form submission.
//!
//! There is no backend: an accepted submission is appended to the
//! `contactSubmissions` log after a simulated network delay.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use crate::draft::DraftStore;
use crate::storage::{KeyValueStore, StorageError, keys, read_json, write_json};
use crate::validation::{Field, FormErrors, MESSAGE_MAX_CHARS, validate_form};

/// Character count above which the message counter turns to a warning.
pub const MESSAGE_WARNING_CHARS: usize = 800;

/// Contact form field values.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
    pub newsletter: bool,
}

impl ContactForm {
    /// Raw value of a text field.
    #[must_use]
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::FirstName => &self.first_name,
            Field::LastName => &self.last_name,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
            Field::Subject => &self.subject,
            Field::Message => &self.message,
        }
    }
}

/// An accepted contact form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    #[serde(flatten)]
    pub form: ContactForm,
    pub submitted_at: DateTime<Utc>,
}

/// Errors from submitting the contact form.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// One or more fields failed validation; nothing was stored.
    #[error("Please fix the errors in the form")]
    Invalid(#[from] FormErrors),

    /// The submission log could not be written.
    #[error("Failed to record submission: {0}")]
    Storage(#[from] StorageError),
}

/// Validates and records contact form submissions.
pub struct ContactService {
    storage: Arc<dyn KeyValueStore>,
    drafts: Arc<DraftStore>,
    submit_delay: Duration,
}

impl std::fmt::Debug for ContactService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContactService")
            .field("submit_delay", &self.submit_delay)
            .finish_non_exhaustive()
    }
}

impl ContactService {
    /// Create a contact service.
    #[must_use]
    pub fn new(
        storage: Arc<dyn KeyValueStore>,
        drafts: Arc<DraftStore>,
        submit_delay: Duration,
    ) -> Self {
        Self {
            storage,
            drafts,
            submit_delay,
        }
    }

    /// Submit the contact form.
    ///
    /// Validates first. An accepted form is recorded after the simulated
    /// delay and the saved draft is cleared. Callers disable resubmission
    /// while this is pending.
    ///
    /// # Errors
    ///
    /// Returns `SubmitError::Invalid` with every failing field, or
    /// `SubmitError::Storage` if the submission cannot be recorded.
    #[instrument(skip_all, fields(email = %form.email))]
    pub async fn submit(&self, form: ContactForm) -> Result<ContactSubmission, SubmitError> {
        if let Err(errors) = validate_form(&form) {
            tracing::info!(failed = errors.len(), "Contact form rejected");
            return Err(errors.into());
        }

        tokio::time::sleep(self.submit_delay).await;

        let submission = ContactSubmission {
            form,
            submitted_at: Utc::now(),
        };

        let mut log: Vec<ContactSubmission> =
            read_json(self.storage.as_ref(), keys::CONTACT_SUBMISSIONS).unwrap_or_default();
        log.push(submission.clone());
        write_json(self.storage.as_ref(), keys::CONTACT_SUBMISSIONS, &log)?;

        if let Err(e) = self.drafts.clear() {
            tracing::warn!(error = %e, "Failed to clear contact draft after submit");
        }

        tracing::info!(total = log.len(), "Contact form submitted");
        Ok(submission)
    }
}

/// Format phone input as `(XXX) XXX-XXXX` while the user types.
///
/// Partial input renders as `(XXX` or `(XXX) XXX`. Non-digits are dropped,
/// as are digits past the tenth.
#[must_use]
pub fn format_phone(input: &str) -> String {
    let digits: String = input.chars().filter(char::is_ascii_digit).take(10).collect();

    match digits.len() {
        0 => String::new(),
        1..=3 => format!("({digits}"),
        4..=6 => {
            let (area, rest) = digits.split_at(3);
            format!("({area}) {rest}")
        }
        _ => {
            let (area, rest) = digits.split_at(3);
            let (exchange, line) = rest.split_at(3);
            format!("({area}) {exchange}-{line}")
        }
    }
}

/// State of the message character counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLength {
    Ok(usize),
    /// Getting close to the limit.
    Warning(usize),
    TooLong(usize),
}

impl MessageLength {
    /// Classify the length of `message`.
    #[must_use]
    pub fn of(message: &str) -> Self {
        let len = message.chars().count();
        if len > MESSAGE_MAX_CHARS {
            Self::TooLong(len)
        } else if len > MESSAGE_WARNING_CHARS {
            Self::Warning(len)
        } else {
            Self::Ok(len)
        }
    }

    /// Counter text, e.g. `42 / 1000 characters`.
    #[must_use]
    pub fn label(self) -> String {
        let (Self::Ok(len) | Self::Warning(len) | Self::TooLong(len)) = self;
        format!("{len} / {MESSAGE_MAX_CHARS} characters")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::draft::DEFAULT_DRAFT_TTL;
    use crate::storage::MemoryStorage;

    fn valid_form() -> ContactForm {
        ContactForm {
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            email: "grace@example.com".to_string(),
            phone: "(555) 123-4567".to_string(),
            subject: "support".to_string(),
            message: "My AirPods will not pair.".to_string(),
            newsletter: true,
        }
    }

    fn service() -> (Arc<MemoryStorage>, Arc<DraftStore>, ContactService) {
        let storage = Arc::new(MemoryStorage::new());
        let drafts = Arc::new(DraftStore::new(storage.clone(), DEFAULT_DRAFT_TTL));
        let service = ContactService::new(storage.clone(), drafts.clone(), Duration::from_millis(1500));
        (storage, drafts, service)
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_appends_and_clears_draft() {
        let (storage, drafts, service) = service();
        drafts.save(&valid_form()).unwrap();

        let first = service.submit(valid_form()).await.unwrap();
        service.submit(valid_form()).await.unwrap();

        let log: Vec<ContactSubmission> =
            read_json(storage.as_ref(), keys::CONTACT_SUBMISSIONS).unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log.first().unwrap(), &first);
        assert_eq!(drafts.load(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_waits_for_simulated_delay() {
        let (_storage, _drafts, service) = service();
        let started = tokio::time::Instant::now();
        service.submit(valid_form()).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(1500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_submit_stores_nothing() {
        let (storage, drafts, service) = service();
        drafts.save(&valid_form()).unwrap();

        let form = ContactForm {
            message: "short".to_string(),
            ..valid_form()
        };
        let err = service.submit(form).await.unwrap_err();

        let SubmitError::Invalid(errors) = err else {
            panic!("expected validation failure");
        };
        assert_eq!(errors.len(), 1);
        assert_eq!(storage.get(keys::CONTACT_SUBMISSIONS).unwrap(), None);
        assert!(drafts.load().is_some());
    }

    #[test]
    fn test_submission_json_layout() {
        let submission = ContactSubmission {
            form: valid_form(),
            submitted_at: Utc::now(),
        };
        let json = serde_json::to_value(&submission).unwrap();
        assert_eq!(json.get("lastName").unwrap(), "Hopper");
        assert!(json.get("submittedAt").is_some());
    }

    #[test]
    fn test_format_phone() {
        assert_eq!(format_phone(""), "");
        assert_eq!(format_phone("5"), "(5");
        assert_eq!(format_phone("555"), "(555");
        assert_eq!(format_phone("5551"), "(555) 1");
        assert_eq!(format_phone("555123"), "(555) 123");
        assert_eq!(format_phone("5551234"), "(555) 123-4");
        assert_eq!(format_phone("(555) 123-4567 ext 89"), "(555) 123-4567");
    }

    #[test]
    fn test_message_length() {
        assert_eq!(MessageLength::of("hello"), MessageLength::Ok(5));
        assert_eq!(MessageLength::of(&"x".repeat(801)), MessageLength::Warning(801));
        assert_eq!(
            MessageLength::of(&"x".repeat(1001)),
            MessageLength::TooLong(1001)
        );
        assert_eq!(MessageLength::of("hello").label(), "5 / 1000 characters");
    }
}
