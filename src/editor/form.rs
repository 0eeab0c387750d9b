use crate::body::serialize_body;
use crate::content::{CONTACT_TAB, ContactDetails, TabContent};

/// Text inputs of the contact fieldset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub phone: String,
    pub email: String,
    pub recipient: String,
    pub endpoint: String,
    pub submitting: String,
    pub success: String,
    pub error: String,
}

/// Addresses one input of the contact fieldset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    Phone,
    Email,
    Recipient,
    Endpoint,
    Submitting,
    Success,
    Error,
}

impl ContactForm {
    fn from_details(details: Option<&ContactDetails>) -> Self {
        let Some(details) = details else {
            return Self::default();
        };
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        Self {
            phone: text(&details.phone_number),
            email: text(&details.email_address),
            recipient: text(&details.form_recipient),
            endpoint: text(&details.form_endpoint),
            submitting: text(&details.submitting_message),
            success: text(&details.success_message),
            error: text(&details.error_message),
        }
    }

    pub fn field(&self, field: ContactField) -> &str {
        match field {
            ContactField::Phone => &self.phone,
            ContactField::Email => &self.email,
            ContactField::Recipient => &self.recipient,
            ContactField::Endpoint => &self.endpoint,
            ContactField::Submitting => &self.submitting,
            ContactField::Success => &self.success,
            ContactField::Error => &self.error,
        }
    }

    pub(super) fn field_mut(&mut self, field: ContactField) -> &mut String {
        match field {
            ContactField::Phone => &mut self.phone,
            ContactField::Email => &mut self.email,
            ContactField::Recipient => &mut self.recipient,
            ContactField::Endpoint => &mut self.endpoint,
            ContactField::Submitting => &mut self.submitting,
            ContactField::Success => &mut self.success,
            ContactField::Error => &mut self.error,
        }
    }
}

/// The editing form for one tab.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorForm {
    pub title: String,
    /// Body in its plain-text form (see [`crate::body`])
    pub body: String,
    /// Present only while the contact tab is selected
    pub contact: Option<ContactForm>,
}

impl EditorForm {
    /// Populate the form for `key` from its current content.
    ///
    /// A tab without content yields an empty form.
    pub fn from_tab(key: &str, content: Option<&TabContent>) -> Self {
        let is_contact = key == CONTACT_TAB;
        let Some(content) = content else {
            return Self {
                contact: is_contact.then(ContactForm::default),
                ..Self::default()
            };
        };
        Self {
            title: content.title.clone(),
            body: serialize_body(&content.body),
            contact: is_contact
                .then(|| ContactForm::from_details(content.contact_details.as_ref())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Block;

    #[test]
    fn test_contact_form_only_for_contact_tab() {
        let content = TabContent::new("Contact", vec![Block::text("Hi")]).with_contact_details(
            ContactDetails {
                phone_number: Some("555".to_string()),
                ..ContactDetails::default()
            },
        );
        let form = EditorForm::from_tab("contact", Some(&content));
        assert_eq!(form.title, "Contact");
        assert_eq!(form.body, "Hi");
        assert_eq!(form.contact.as_ref().unwrap().phone, "555");
        assert_eq!(form.contact.as_ref().unwrap().email, "");

        let form = EditorForm::from_tab("authors", Some(&content));
        assert!(form.contact.is_none());
    }

    #[test]
    fn test_missing_tab_gives_empty_form() {
        let form = EditorForm::from_tab("events", None);
        assert_eq!(form, EditorForm::default());
    }

    #[test]
    fn test_field_accessors() {
        let mut form = ContactForm::default();
        *form.field_mut(ContactField::Recipient) = "a@b.pl".to_string();
        assert_eq!(form.field(ContactField::Recipient), "a@b.pl");
        assert_eq!(form.recipient, "a@b.pl");
    }
}
