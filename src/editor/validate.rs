use crate::body::{merge_form_blocks, parse_body};
use crate::contact::{
    DEFAULT_EMAIL_LABEL, DEFAULT_ERROR_MESSAGE, DEFAULT_PHONE_LABEL, DEFAULT_SUBMITTING_MESSAGE,
    DEFAULT_SUCCESS_MESSAGE, is_valid_email,
};
use crate::content::{CONTACT_TAB, ContactDetails, TabContent};

use super::form::{ContactForm, EditorForm};

/// First failed check of a submitted form, shown to the user as is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please provide a title before updating the configuration.")]
    EmptyTitle,
    #[error("Please add at least one paragraph or list item to the body.")]
    EmptyBody,
    #[error("Please provide a phone number or an email address for the contact section.")]
    MissingContactChannel,
    #[error("Please enter a valid {0} address.")]
    InvalidEmail(&'static str),
}

/// Check `form` for tab `key` and build the tab it describes.
///
/// `current` is the tab as it stands before the edit; its form blocks and
/// contact labels carry over into the result. Checks run in order: title,
/// body, then (contact tab only) contact channel and email shapes.
///
/// # Errors
/// Returns the first check that failed.
pub fn validate(
    key: &str,
    form: &EditorForm,
    current: Option<&TabContent>,
) -> Result<TabContent, ValidationError> {
    let title = form.title.trim();
    if title.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }

    let parsed = parse_body(&form.body);
    if parsed.is_empty() {
        return Err(ValidationError::EmptyBody);
    }
    let body = match current {
        Some(current) => merge_form_blocks(parsed, &current.body),
        None => parsed,
    };

    let mut content = TabContent::new(title, body);
    if key == CONTACT_TAB {
        let contact = form.contact.clone().unwrap_or_default();
        let existing = current.and_then(|tab| tab.contact_details.as_ref());
        content.contact_details = Some(contact_details(&contact, existing)?);
    }
    Ok(content)
}

fn contact_details(
    form: &ContactForm,
    existing: Option<&ContactDetails>,
) -> Result<ContactDetails, ValidationError> {
    let phone = form.phone.trim();
    let email = form.email.trim();
    let recipient = form.recipient.trim();

    if phone.is_empty() && email.is_empty() {
        return Err(ValidationError::MissingContactChannel);
    }
    if !email.is_empty() && !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail("email"));
    }
    if !recipient.is_empty() && !is_valid_email(recipient) {
        return Err(ValidationError::InvalidEmail("recipient email"));
    }

    let keep = |value: Option<&Option<String>>, default: &str| {
        Some(
            value
                .and_then(Option::as_deref)
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
                .to_string(),
        )
    };
    let or_default = |input: &str, default: &str| {
        let input = input.trim();
        Some(if input.is_empty() { default } else { input }.to_string())
    };

    // Cleared inputs are stored as empty strings so they override defaults.
    Ok(ContactDetails {
        phone_label: keep(existing.map(|d| &d.phone_label), DEFAULT_PHONE_LABEL),
        phone_number: Some(phone.to_string()),
        email_label: keep(existing.map(|d| &d.email_label), DEFAULT_EMAIL_LABEL),
        email_address: Some(email.to_string()),
        form_recipient: Some(if recipient.is_empty() { email } else { recipient }.to_string()),
        form_endpoint: Some(form.endpoint.trim().to_string()),
        subject: existing.and_then(|d| d.subject.clone()),
        submitting_message: or_default(&form.submitting, DEFAULT_SUBMITTING_MESSAGE),
        success_message: or_default(&form.success, DEFAULT_SUCCESS_MESSAGE),
        error_message: or_default(&form.error, DEFAULT_ERROR_MESSAGE),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Block, FormSpec};

    fn form(title: &str, body: &str) -> EditorForm {
        EditorForm {
            title: title.to_string(),
            body: body.to_string(),
            contact: None,
        }
    }

    fn contact_form(phone: &str, email: &str) -> EditorForm {
        EditorForm {
            contact: Some(ContactForm {
                phone: phone.to_string(),
                email: email.to_string(),
                ..ContactForm::default()
            }),
            ..form("Contact", "Write to us")
        }
    }

    #[test]
    fn test_checks_run_in_order() {
        assert_eq!(
            validate("contact", &form("  ", ""), None),
            Err(ValidationError::EmptyTitle)
        );
        assert_eq!(
            validate("contact", &form("Contact", "\n \n"), None),
            Err(ValidationError::EmptyBody)
        );
        assert_eq!(
            validate("contact", &contact_form(" ", ""), None),
            Err(ValidationError::MissingContactChannel)
        );
    }

    #[test]
    fn test_non_contact_tab_skips_contact_checks() {
        let content = validate("authors", &form(" Authors ", "Hello\n\n- a"), None).unwrap();
        assert_eq!(content.title, "Authors");
        assert_eq!(content.body, vec![Block::text("Hello"), Block::list(["a"])]);
        assert!(content.contact_details.is_none());
    }

    #[test]
    fn test_either_channel_is_enough() {
        assert!(validate("contact", &contact_form("555", ""), None).is_ok());
        assert!(validate("contact", &contact_form("", "a@b.pl"), None).is_ok());
    }

    #[test]
    fn test_email_shape_is_checked() {
        assert_eq!(
            validate("contact", &contact_form("", "not-an-email"), None),
            Err(ValidationError::InvalidEmail("email"))
        );
        let mut bad_recipient = contact_form("555", "");
        bad_recipient.contact.as_mut().unwrap().recipient = "nope".to_string();
        assert_eq!(
            validate("contact", &bad_recipient, None),
            Err(ValidationError::InvalidEmail("recipient email"))
        );
    }

    #[test]
    fn test_contact_details_defaults_and_recipient_fallback() {
        let content = validate("contact", &contact_form(" 555 ", "a@b.pl"), None).unwrap();
        let details = content.contact_details.unwrap();
        assert_eq!(details.phone_number.as_deref(), Some("555"));
        assert_eq!(details.form_recipient.as_deref(), Some("a@b.pl"));
        assert_eq!(details.phone_label.as_deref(), Some(DEFAULT_PHONE_LABEL));
        assert_eq!(
            details.submitting_message.as_deref(),
            Some(DEFAULT_SUBMITTING_MESSAGE)
        );
        assert_eq!(details.form_endpoint.as_deref(), Some(""));
    }

    #[test]
    fn test_existing_labels_and_subject_carry_over() {
        let current = TabContent::new("Kontakt", vec![]).with_contact_details(ContactDetails {
            phone_label: Some("Telefon".to_string()),
            subject: Some("Zapytanie".to_string()),
            ..ContactDetails::default()
        });
        let content = validate("contact", &contact_form("555", ""), Some(&current)).unwrap();
        let details = content.contact_details.unwrap();
        assert_eq!(details.phone_label.as_deref(), Some("Telefon"));
        assert_eq!(details.email_label.as_deref(), Some(DEFAULT_EMAIL_LABEL));
        assert_eq!(details.subject.as_deref(), Some("Zapytanie"));
        assert_eq!(details.email_address.as_deref(), Some(""));
    }

    #[test]
    fn test_form_blocks_survive_text_edit() {
        let form_block = Block::Form(FormSpec::default());
        let current = TabContent::new("Authors", vec![Block::text("Old"), form_block.clone()]);
        let content = validate("authors", &form("Authors", "New"), Some(&current)).unwrap();
        assert_eq!(content.body, vec![Block::text("New"), form_block]);
    }
}
