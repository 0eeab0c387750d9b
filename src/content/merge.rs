//! Default ← override merge.
//!
//! The policy is not a generic recursive merge:
//! - tab records merge shallowly (`title`, `store` and unknown keys replace);
//! - `body` replaces the default body wholesale;
//! - `contactDetails` merges one level deeper, field by field;
//! - `null`/absent override values never touch the default.

use super::types::{ContactDetails, ContentTree, OverrideTree, TabContent, TabOverride};

/// Merge `overrides` over `defaults`, producing the effective tree.
///
/// Every default key survives. Keys only present in `overrides` are added
/// as-is, after the defaults. The function is pure, idempotent and has the
/// empty override tree as identity.
pub fn merge_content(defaults: &ContentTree, overrides: &OverrideTree) -> ContentTree {
    let mut merged = defaults.clone();
    for (key, value) in overrides.iter() {
        let Some(tab_override) = value else {
            continue;
        };
        if let Some(existing) = merged.get_mut(key) {
            existing.apply(tab_override);
        } else {
            let mut fresh = TabContent::default();
            fresh.apply(tab_override);
            merged.insert(key, fresh);
        }
    }
    merged
}

impl TabContent {
    /// Apply a partial override to this tab in place.
    pub fn apply(&mut self, patch: &TabOverride) {
        if let Some(title) = &patch.title {
            self.title.clone_from(title);
        }
        if let Some(body) = &patch.body {
            self.body.clone_from(body);
        }
        if let Some(details) = &patch.contact_details {
            match &mut self.contact_details {
                Some(existing) => existing.apply(details),
                None => self.contact_details = Some(details.clone()),
            }
        }
        if let Some(store) = &patch.store {
            self.store = Some(store.clone());
        }
        for (key, value) in &patch.extra {
            if !value.is_null() {
                self.extra.insert(key.clone(), value.clone());
            }
        }
    }

    /// Return a copy of this tab with `patch` applied.
    pub fn merged_with(&self, patch: &TabOverride) -> Self {
        let mut next = self.clone();
        next.apply(patch);
        next
    }
}

impl ContactDetails {
    /// Field-level merge: every field set in `patch` wins.
    pub fn apply(&mut self, patch: &Self) {
        fn take(target: &mut Option<String>, value: &Option<String>) {
            if let Some(value) = value {
                *target = Some(value.clone());
            }
        }

        take(&mut self.phone_label, &patch.phone_label);
        take(&mut self.phone_number, &patch.phone_number);
        take(&mut self.email_label, &patch.email_label);
        take(&mut self.email_address, &patch.email_address);
        take(&mut self.form_recipient, &patch.form_recipient);
        take(&mut self.form_endpoint, &patch.form_endpoint);
        take(&mut self.subject, &patch.subject);
        take(&mut self.submitting_message, &patch.submitting_message);
        take(&mut self.success_message, &patch.success_message);
        take(&mut self.error_message, &patch.error_message);
    }
}
