//! Contact form field validation.
//!
//! Every check is a pure function of the field and its value. Values are
//! trimmed before checking; empty optional fields always pass.

use std::fmt;
use std::sync::LazyLock;

use click_me_core::Email;
use regex::Regex;
use thiserror::Error;

use crate::contact::ContactForm;

/// Shortest accepted message, in characters.
pub const MESSAGE_MIN_CHARS: usize = 10;

/// Longest accepted message, in characters.
pub const MESSAGE_MAX_CHARS: usize = 1000;

/// Minimum number of digits in a phone number.
pub const PHONE_MIN_DIGITS: usize = 10;

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9\s\-+()]+$").expect("Invalid regex"));

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s]+$").expect("Invalid regex"));

/// Contact form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    FirstName,
    LastName,
    Email,
    Phone,
    Subject,
    Message,
}

impl Field {
    /// All fields, in form order.
    pub const ALL: [Self; 6] = [
        Self::FirstName,
        Self::LastName,
        Self::Email,
        Self::Phone,
        Self::Subject,
        Self::Message,
    ];

    /// Whether the field must be filled in.
    #[must_use]
    pub const fn is_required(self) -> bool {
        !matches!(self, Self::Phone)
    }

    /// Form element id for this field.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Subject => "subject",
            Self::Message => "message",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Why a field value was rejected. `Display` gives the user-facing reason.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("This field is required")]
    Required,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Please enter a valid phone number")]
    InvalidPhone,
    #[error("Name can only contain letters and spaces")]
    InvalidName,
    #[error("Message must be at least 10 characters long")]
    MessageTooShort,
    #[error("Message must be less than 1000 characters")]
    MessageTooLong,
}

/// Every field that failed whole-form validation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Error)]
#[error("{} field(s) failed validation", .0.len())]
pub struct FormErrors(pub Vec<(Field, FieldError)>);

impl FormErrors {
    /// The failure for `field`, if any.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&FieldError> {
        self.0
            .iter()
            .find_map(|(f, error)| (*f == field).then_some(error))
    }

    /// Failed fields with their reasons, in form order.
    pub fn iter(&self) -> impl Iterator<Item = &(Field, FieldError)> {
        self.0.iter()
    }

    /// Number of failed fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Validate a single field value.
///
/// # Errors
///
/// Returns the first rule the trimmed value breaks.
pub fn validate_field(field: Field, raw: &str) -> Result<(), FieldError> {
    let value = raw.trim();

    if value.is_empty() {
        return if field.is_required() {
            Err(FieldError::Required)
        } else {
            Ok(())
        };
    }

    match field {
        Field::Email => Email::parse(value)
            .map(|_| ())
            .map_err(|_| FieldError::InvalidEmail),
        Field::Phone => check_phone(value),
        Field::FirstName | Field::LastName => {
            if NAME_RE.is_match(value) {
                Ok(())
            } else {
                Err(FieldError::InvalidName)
            }
        }
        Field::Message => check_message(value),
        Field::Subject => Ok(()),
    }
}

/// Validate the whole form.
///
/// # Errors
///
/// Returns every failing field; the form is valid only if none fail.
pub fn validate_form(form: &ContactForm) -> Result<(), FormErrors> {
    let errors: Vec<(Field, FieldError)> = Field::ALL
        .into_iter()
        .filter_map(|field| {
            validate_field(field, form.value(field))
                .err()
                .map(|error| (field, error))
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(FormErrors(errors))
    }
}

fn check_phone(value: &str) -> Result<(), FieldError> {
    let digits = value.chars().filter(char::is_ascii_digit).count();
    if PHONE_RE.is_match(value) && digits >= PHONE_MIN_DIGITS {
        Ok(())
    } else {
        Err(FieldError::InvalidPhone)
    }
}

fn check_message(value: &str) -> Result<(), FieldError> {
    let len = value.chars().count();
    if len < MESSAGE_MIN_CHARS {
        Err(FieldError::MessageTooShort)
    } else if len > MESSAGE_MAX_CHARS {
        Err(FieldError::MessageTooLong)
    } else {
        Ok(())
    }
}
