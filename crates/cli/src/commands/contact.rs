//! Contact form commands.
//!
//! Field flags left out fall back to the saved draft, so a form can be built
//! up across several `contact draft save` calls and then submitted.

use clap::Args;
use click_me_storefront::contact::{ContactForm, MessageLength, format_phone};
use click_me_storefront::{AppError, AppState};
use tracing::{info, warn};

/// Contact form fields.
#[derive(Debug, Default, Args)]
pub struct ContactArgs {
    #[arg(long)]
    first_name: Option<String>,

    #[arg(long)]
    last_name: Option<String>,

    #[arg(long)]
    email: Option<String>,

    /// Digits are formatted as (XXX) XXX-XXXX
    #[arg(long)]
    phone: Option<String>,

    #[arg(long)]
    subject: Option<String>,

    #[arg(long)]
    message: Option<String>,

    /// Subscribe to the newsletter
    #[arg(long, overrides_with = "no_newsletter")]
    newsletter: bool,

    /// Unsubscribe from the newsletter
    #[arg(long, overrides_with = "newsletter")]
    no_newsletter: bool,
}

impl ContactArgs {
    /// Overlay the given flags on `base`.
    fn apply(self, base: ContactForm) -> ContactForm {
        ContactForm {
            first_name: self.first_name.unwrap_or(base.first_name),
            last_name: self.last_name.unwrap_or(base.last_name),
            email: self.email.unwrap_or(base.email),
            phone: self.phone.map_or(base.phone, |phone| format_phone(&phone)),
            subject: self.subject.unwrap_or(base.subject),
            message: self.message.unwrap_or(base.message),
            newsletter: match (self.newsletter, self.no_newsletter) {
                (true, _) => true,
                (_, true) => false,
                (false, false) => base.newsletter,
            },
        }
    }
}

fn draft_or_default(state: &AppState) -> ContactForm {
    state
        .drafts()
        .load()
        .map(|draft| draft.form)
        .unwrap_or_default()
}

/// Save the draft.
///
/// # Errors
///
/// Returns a storage error if the draft cannot be written.
pub fn save_draft(state: &AppState, args: ContactArgs) -> Result<(), AppError> {
    let form = args.apply(draft_or_default(state));
    let draft = state.drafts().save(&form)?;

    info!(saved_at = %draft.saved_at, "Draft saved");
    log_message_length(&form.message);
    Ok(())
}

/// Show the draft if it is still fresh.
pub fn show_draft(state: &AppState) {
    let Some(draft) = state.drafts().load() else {
        info!("No saved draft");
        return;
    };

    let form = &draft.form;
    info!(saved_at = %draft.saved_at, "Saved draft");
    info!("Name: {} {}", form.first_name, form.last_name);
    info!("Email: {}", form.email);
    if !form.phone.is_empty() {
        info!("Phone: {}", form.phone);
    }
    info!("Subject: {}", form.subject);
    info!("Message: {}", form.message);
    info!(newsletter = form.newsletter, "Newsletter");
}

/// Delete the draft.
///
/// # Errors
///
/// Returns a storage error if the draft cannot be deleted.
pub fn clear_draft(state: &AppState) -> Result<(), AppError> {
    state.drafts().clear()?;
    info!("Draft cleared");
    Ok(())
}

/// Validate and submit the form.
///
/// # Errors
///
/// Returns `AppError::Validation` listing every invalid field, or a storage
/// error if the submission cannot be recorded.
pub async fn submit(state: &AppState, args: ContactArgs) -> Result<(), AppError> {
    let form = args.apply(draft_or_default(state));
    log_message_length(&form.message);

    info!("Sending...");
    let submission = state.contact().submit(form).await?;

    info!(
        submitted_at = %submission.submitted_at,
        "Thank you for your message! We'll get back to you within 24 hours."
    );
    Ok(())
}

fn log_message_length(message: &str) {
    match MessageLength::of(message) {
        length @ MessageLength::Ok(_) => info!("{}", length.label()),
        length @ (MessageLength::Warning(_) | MessageLength::TooLong(_)) => {
            warn!("{}", length.label());
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_draft() {
        let base = ContactForm {
            first_name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            ..ContactForm::default()
        };
        let args = ContactArgs {
            email: Some("countess@example.com".to_string()),
            phone: Some("5551234567".to_string()),
            ..ContactArgs::default()
        };

        let form = args.apply(base);
        assert_eq!(form.first_name, "Ada");
        assert_eq!(form.email, "countess@example.com");
        assert_eq!(form.phone, "(555) 123-4567");
    }

    #[test]
    fn test_newsletter_opt_out_overrides_draft() {
        let base = ContactForm {
            newsletter: true,
            ..ContactForm::default()
        };

        let kept = ContactArgs::default().apply(base.clone());
        assert!(kept.newsletter);

        let opted_out = ContactArgs {
            no_newsletter: true,
            ..ContactArgs::default()
        }
        .apply(base);
        assert!(!opted_out.newsletter);
    }

    #[test]
    fn test_newsletter_flags_last_one_wins() {
        use clap::Parser;

        #[derive(Parser)]
        struct Form {
            #[command(flatten)]
            args: ContactArgs,
        }

        let form = Form::try_parse_from(["contact", "--newsletter", "--no-newsletter"]).unwrap();
        assert!(!form.args.apply(ContactForm::default()).newsletter);

        let form = Form::try_parse_from(["contact", "--no-newsletter", "--newsletter"]).unwrap();
        assert!(form.args.apply(ContactForm::default()).newsletter);
    }
}
