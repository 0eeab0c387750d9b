//! Contact section support: normalised contact details, relay endpoint
//! derivation and contact-form submission.
//!
//! Delivery itself goes through a [`MailRelay`]; this module only decides
//! where to send, what to send, and what to tell the visitor.

use once_cell::sync::Lazy;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use regex::Regex;

use crate::content::ContactDetails;

/// Base of the AJAX endpoint of the mail relay service.
pub const RELAY_BASE_URL: &str = "https://formsubmit.co/ajax/";

pub const DEFAULT_PHONE_LABEL: &str = "Phone";
pub const DEFAULT_EMAIL_LABEL: &str = "Email";
pub const DEFAULT_SUBMITTING_MESSAGE: &str = "Sending your message…";
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Thank you! We will be in touch shortly.";
pub const DEFAULT_ERROR_MESSAGE: &str = "Sorry, something went wrong. Please try again later.";
pub const INVALID_PAYLOAD_MESSAGE: &str = "Please provide a valid name, email address, and message.";

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// Basic shape check for an email address.
pub fn is_valid_email(address: &str) -> bool {
    EMAIL_PATTERN.is_match(address)
}

/// Bytes `encodeURIComponent` escapes.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode `value` the way `encodeURIComponent` does.
pub fn encode_uri_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Resolve the relay endpoint for a contact form.
///
/// An explicit `formEndpoint` is used verbatim when there is no recipient
/// to check it against, or when it already targets the recipient.
/// Otherwise the endpoint is derived from the recipient (`formRecipient`,
/// falling back to `emailAddress`). `None` when there is nothing to send to.
pub fn build_endpoint(details: &ContactDetails) -> Option<String> {
    let target = non_empty(details.form_recipient.as_ref())
        .or_else(|| non_empty(details.email_address.as_ref()));

    if let Some(endpoint) = non_empty(details.form_endpoint.as_ref()) {
        match target {
            None => return Some(endpoint.to_string()),
            Some(target) if endpoint.contains(&encode_uri_component(target)) => {
                return Some(endpoint.to_string());
            }
            Some(_) => {}
        }
    }

    target.map(|target| format!("{RELAY_BASE_URL}{}", encode_uri_component(target)))
}

/// Fill in labels, messages, recipient and endpoint.
///
/// Returns `None` when neither a phone number nor an email address is
/// available; such a contact section is not rendered at all.
pub fn normalise_contact_details(details: &ContactDetails) -> Option<ContactDetails> {
    let email = non_empty(details.email_address.as_ref())
        .or_else(|| non_empty(details.form_recipient.as_ref()))
        .map(str::to_string);
    let phone = non_empty(details.phone_number.as_ref()).map(str::to_string);
    if email.is_none() && phone.is_none() {
        return None;
    }

    let endpoint_source = ContactDetails {
        email_address: email.clone(),
        ..details.clone()
    };
    let or_default = |value: &Option<String>, default: &str| {
        Some(
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
                .to_string(),
        )
    };

    Some(ContactDetails {
        phone_label: or_default(&details.phone_label, DEFAULT_PHONE_LABEL),
        phone_number: phone,
        email_label: or_default(&details.email_label, DEFAULT_EMAIL_LABEL),
        form_recipient: email.clone(),
        email_address: email,
        form_endpoint: build_endpoint(&endpoint_source),
        subject: details.subject.clone(),
        submitting_message: or_default(&details.submitting_message, DEFAULT_SUBMITTING_MESSAGE),
        success_message: or_default(&details.success_message, DEFAULT_SUCCESS_MESSAGE),
        error_message: or_default(&details.error_message, DEFAULT_ERROR_MESSAGE),
    })
}

/// Strip everything but `+` and digits, for `tel:` links.
pub fn sanitize_phone(number: &str) -> String {
    number
        .chars()
        .filter(|c| *c == '+' || c.is_ascii_digit())
        .collect()
}

/// `tel:` link for a display phone number, `#` when no digits remain.
pub fn tel_link(number: &str) -> String {
    let sanitized = sanitize_phone(number);
    if sanitized.is_empty() {
        "#".to_string()
    } else {
        format!("tel:{sanitized}")
    }
}

/// `mailto:` link with optional subject and body.
pub fn mailto_link(address: &str, subject: Option<&str>, body: Option<&str>) -> String {
    let mut link = format!("mailto:{address}");
    let mut params = Vec::new();
    if let Some(subject) = subject.filter(|s| !s.is_empty()) {
        params.push(format!("subject={}", encode_uri_component(subject)));
    }
    if let Some(body) = body.filter(|b| !b.is_empty()) {
        params.push(format!("body={}", encode_uri_component(body)));
    }
    if !params.is_empty() {
        link.push('?');
        link.push_str(&params.join("&"));
    }
    link
}

/// A visitor's contact-form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactPayload {
    pub name: String,
    pub email: String,
    pub message: String,
    pub recipient: String,
}

impl ContactPayload {
    /// Build a payload from raw form input, trimming every field.
    pub fn new(name: &str, email: &str, message: &str, details: &ContactDetails) -> Self {
        let recipient = non_empty(details.form_recipient.as_ref())
            .or_else(|| non_empty(details.email_address.as_ref()))
            .unwrap_or_default();
        Self {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            message: message.trim().to_string(),
            recipient: recipient.to_string(),
        }
    }

    /// Name, email and message are required; the email must look valid.
    pub fn is_valid(&self) -> bool {
        !self.name.is_empty()
            && !self.message.is_empty()
            && !self.email.is_empty()
            && is_valid_email(&self.email)
    }

    /// Form fields as posted to the relay.
    pub fn form_fields(&self, subject: Option<&str>) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("name", self.name.clone()),
            ("email", self.email.clone()),
            ("message", self.message.clone()),
            ("_replyto", self.email.clone()),
        ];
        if !self.recipient.is_empty() {
            fields.push(("_to", self.recipient.clone()));
        }
        if let Some(subject) = subject.filter(|s| !s.is_empty()) {
            fields.push(("_subject", subject.to_string()));
        }
        fields
    }
}

/// Why a relay could not deliver a message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    #[error("relay responded with status {0}")]
    Status(u16),
    #[error("relay declined the message")]
    Declined,
    #[error("network request failed: {0}")]
    Network(String),
}

/// Third-party mail relay.
pub trait MailRelay {
    /// Post `fields` to `endpoint`.
    ///
    /// # Errors
    /// Returns an error when the message was not accepted.
    fn deliver(&mut self, endpoint: &str, fields: &[(&'static str, String)])
    -> Result<(), DeliveryError>;
}

/// Result of a contact-form submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStatus {
    /// Payload failed validation, nothing was sent
    Invalid,
    /// Message accepted (or no relay configured)
    Sent,
    /// Relay failed; a `mailto:` fallback is offered when possible
    Failed,
}

/// What to show the visitor after submitting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionOutcome {
    pub status: SubmissionStatus,
    pub message: String,
    /// Alternate contact path offered on failure
    pub fallback: Option<String>,
}

/// Validate and deliver a contact-form submission.
///
/// `details` should already be normalised. Without an endpoint the
/// submission is accepted locally, as the static page does.
pub fn submit_contact_form(
    relay: &mut impl MailRelay,
    details: &ContactDetails,
    payload: &ContactPayload,
) -> SubmissionOutcome {
    if !payload.is_valid() {
        return SubmissionOutcome {
            status: SubmissionStatus::Invalid,
            message: INVALID_PAYLOAD_MESSAGE.to_string(),
            fallback: None,
        };
    }

    let success = details
        .success_message
        .clone()
        .unwrap_or_else(|| DEFAULT_SUCCESS_MESSAGE.to_string());
    let Some(endpoint) = build_endpoint(details) else {
        tracing::debug!("no relay endpoint configured, accepting submission locally");
        return SubmissionOutcome {
            status: SubmissionStatus::Sent,
            message: success,
            fallback: None,
        };
    };

    let fields = payload.form_fields(details.subject.as_deref());
    match relay.deliver(&endpoint, &fields) {
        Ok(()) => SubmissionOutcome {
            status: SubmissionStatus::Sent,
            message: success,
            fallback: None,
        },
        Err(err) => {
            tracing::warn!(endpoint = %endpoint, error = %err, "contact form delivery failed");
            let fallback = (!payload.recipient.is_empty()).then(|| {
                mailto_link(
                    &payload.recipient,
                    details.subject.as_deref(),
                    Some(&payload.message),
                )
            });
            SubmissionOutcome {
                status: SubmissionStatus::Failed,
                message: details
                    .error_message
                    .clone()
                    .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string()),
                fallback,
            }
        }
    }
}
