//! Integration tests for the contact form.
//!
//! Validation rules, draft freshness and the submission flow.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use chrono::{TimeDelta, Utc};
use click_me_integration_tests::file_backed_state;
use click_me_storefront::contact::{ContactForm, ContactSubmission, SubmitError};
use click_me_storefront::storage::{KeyValueStore, keys, read_json};
use click_me_storefront::validation::{Field, FieldError, validate_field, validate_form};

fn valid_form() -> ContactForm {
    ContactForm {
        first_name: "Katherine".to_string(),
        last_name: "Johnson".to_string(),
        email: "katherine@example.com".to_string(),
        phone: "(757) 864-1000".to_string(),
        subject: "order".to_string(),
        message: "My Dell XPS 13 order has not shipped yet.".to_string(),
        newsletter: false,
    }
}

// =============================================================================
// Validation Tests
// =============================================================================

#[test]
fn test_email_rules() {
    assert_eq!(validate_field(Field::Email, "a@b.co"), Ok(()));
    assert_eq!(
        validate_field(Field::Email, "a@b"),
        Err(FieldError::InvalidEmail)
    );
    assert_eq!(
        validate_field(Field::Email, "a b@c.com"),
        Err(FieldError::InvalidEmail)
    );
}

#[test]
fn test_message_length_rules() {
    assert_eq!(
        validate_field(Field::Message, &"m".repeat(9)),
        Err(FieldError::MessageTooShort)
    );
    assert_eq!(validate_field(Field::Message, &"m".repeat(10)), Ok(()));
    assert_eq!(
        validate_field(Field::Message, &"m".repeat(1001)),
        Err(FieldError::MessageTooLong)
    );
}

#[test]
fn test_empty_form_lists_every_required_field() {
    let errors = validate_form(&ContactForm::default()).unwrap_err();

    let failed: Vec<Field> = errors.iter().map(|(field, _)| *field).collect();
    assert_eq!(
        failed,
        vec![
            Field::FirstName,
            Field::LastName,
            Field::Email,
            Field::Subject,
            Field::Message
        ]
    );
    assert!(
        errors
            .iter()
            .all(|(_, reason)| *reason == FieldError::Required)
    );
}

// =============================================================================
// Draft Tests
// =============================================================================

#[test]
fn test_draft_freshness_window() {
    let (_dir, storage, state) = file_backed_state();
    let saved_at = Utc::now();
    state.drafts().save_at(&valid_form(), saved_at).unwrap();

    let fresh = state.drafts().load_at(saved_at + TimeDelta::hours(1)).unwrap();
    assert_eq!(fresh.form, valid_form());

    assert_eq!(state.drafts().load_at(saved_at + TimeDelta::hours(25)), None);
    assert_eq!(storage.get(keys::CONTACT_DRAFT).unwrap(), None);
}

#[tokio::test(start_paused = true)]
async fn test_autosave_debounces_typing() {
    let (_dir, _storage, state) = file_backed_state();

    let mut form = ContactForm::default();
    for ch in "Hello there".chars() {
        form.message.push(ch);
        state.autosave_draft(form.clone());
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert_eq!(state.drafts().load(), None);

    tokio::time::sleep(Duration::from_millis(1000)).await;
    tokio::task::yield_now().await;
    assert_eq!(state.drafts().load().unwrap().form.message, "Hello there");
}

// =============================================================================
// Submission Tests
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_submit_records_and_clears_draft() {
    let (_dir, storage, state) = file_backed_state();
    state.drafts().save(&valid_form()).unwrap();

    let started = tokio::time::Instant::now();
    let submission = state.contact().submit(valid_form()).await.unwrap();
    assert!(started.elapsed() >= state.config().submit_delay);

    let log: Vec<ContactSubmission> =
        read_json(storage.as_ref(), keys::CONTACT_SUBMISSIONS).unwrap();
    assert_eq!(log, vec![submission]);
    assert_eq!(state.drafts().load(), None);
}

#[tokio::test(start_paused = true)]
async fn test_rejected_submit_keeps_draft() {
    let (_dir, storage, state) = file_backed_state();
    let form = ContactForm {
        email: "not an email".to_string(),
        phone: "12345".to_string(),
        ..valid_form()
    };
    state.drafts().save(&form).unwrap();

    let err = state.contact().submit(form).await.unwrap_err();
    let SubmitError::Invalid(errors) = err else {
        panic!("expected validation failure");
    };
    assert_eq!(errors.get(Field::Email), Some(&FieldError::InvalidEmail));
    assert_eq!(errors.get(Field::Phone), Some(&FieldError::InvalidPhone));

    assert_eq!(storage.get(keys::CONTACT_SUBMISSIONS).unwrap(), None);
    assert!(state.drafts().load().is_some());
}
