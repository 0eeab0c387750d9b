//! Content model and the default ← override merge.
//!
//! This module handles:
//! - The tab content tree and its JSON wire shape
//! - Partial overrides (`null` means "keep the default")
//! - Merging overrides onto the compiled defaults

mod merge;
mod types;

pub use merge::merge_content;
pub use types::{
    Block, ContactDetails, ContentTree, FormSpec, OverrideTree, StoreWidget, TabContent,
    TabOverride,
};

/// Tab key of the contact section, the only tab with contact validation.
pub const CONTACT_TAB: &str = "contact";
