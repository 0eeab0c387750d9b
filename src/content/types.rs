//! Core content types.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One unit of a tab's body.
///
/// On the wire a text block is a bare JSON string and structured blocks are
/// objects tagged by `type`, matching what the page scripts consume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawBlock", into = "RawBlock")]
pub enum Block {
    /// Plain paragraph
    Text(String),
    /// Bulleted list, one string per item
    List { items: Vec<String> },
    /// Generated form; passed through untouched
    Form(FormSpec),
}

impl Block {
    /// Shorthand for a text block.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Shorthand for a list block.
    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self::List {
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true for blocks the plain-text body editor cannot represent.
    pub const fn is_form(&self) -> bool {
        matches!(self, Self::Form(_))
    }
}

/// Opaque description of an embedded form (field specs, submit label, ...).
///
/// Holds every key of the JSON object except the `type` tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormSpec(pub Map<String, Value>);

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawBlock {
    Text(String),
    Tagged(TaggedBlock),
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum TaggedBlock {
    List { items: Vec<String> },
    Form(FormSpec),
}

impl From<RawBlock> for Block {
    fn from(raw: RawBlock) -> Self {
        match raw {
            RawBlock::Text(text) => Self::Text(text),
            RawBlock::Tagged(TaggedBlock::List { items }) => Self::List { items },
            RawBlock::Tagged(TaggedBlock::Form(spec)) => Self::Form(spec),
        }
    }
}

impl From<Block> for RawBlock {
    fn from(block: Block) -> Self {
        match block {
            Block::Text(text) => Self::Text(text),
            Block::List { items } => Self::Tagged(TaggedBlock::List { items }),
            Block::Form(spec) => Self::Tagged(TaggedBlock::Form(spec)),
        }
    }
}

/// Contact channels and contact-form settings of the contact tab.
///
/// Every field is optional on its own; the same record shape is used for
/// defaults and for overrides, where an absent (or `null`) field means
/// "keep the default".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_recipient: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitting_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Third-party storefront widget mounted on the bookstore tab.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreWidget {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loading_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Content of a single tab.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabContent {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: Vec<Block>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_details: Option<ContactDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<StoreWidget>,
    /// Keys this crate does not model, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TabContent {
    /// Create a tab with a title and body.
    pub fn new(title: impl Into<String>, body: Vec<Block>) -> Self {
        Self {
            title: title.into(),
            body,
            ..Self::default()
        }
    }

    /// Attach contact details.
    pub fn with_contact_details(mut self, details: ContactDetails) -> Self {
        self.contact_details = Some(details);
        self
    }

    /// Attach a storefront widget.
    pub fn with_store(mut self, store: StoreWidget) -> Self {
        self.store = Some(store);
        self
    }
}

/// Partial tab content as stored in the override tree.
///
/// `None` fields, including explicit JSON `null`s, leave the default alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Vec<Block>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_details: Option<ContactDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<StoreWidget>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<TabContent> for TabOverride {
    fn from(content: TabContent) -> Self {
        Self {
            title: Some(content.title),
            body: Some(content.body),
            contact_details: content.contact_details,
            store: content.store,
            extra: content.extra,
        }
    }
}

/// Mapping from tab key to tab content, in page order.
///
/// Used for both the compiled defaults and the effective (merged) tree.
/// Equality ignores key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentTree(IndexMap<String, TabContent>);

impl ContentTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&TabContent> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Insert or replace a tab, keeping its position if it already exists.
    pub fn insert(&mut self, key: impl Into<String>, content: TabContent) -> Option<TabContent> {
        self.0.insert(key.into(), content)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TabContent)> {
        self.0.iter().map(|(key, content)| (key.as_str(), content))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn get_mut(&mut self, key: &str) -> Option<&mut TabContent> {
        self.0.get_mut(key)
    }
}

impl FromIterator<(String, TabContent)> for ContentTree {
    fn from_iter<I: IntoIterator<Item = (String, TabContent)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// User-authored partial content, keyed by tab.
///
/// A `None` entry is the explicit "no override" marker (`null` on the wire).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverrideTree(IndexMap<String, Option<TabOverride>>);

impl OverrideTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&TabOverride> {
        self.0.get(key).and_then(Option::as_ref)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: TabOverride) {
        self.0.insert(key.into(), Some(value));
    }

    /// Record an explicit `null` for `key`.
    pub fn insert_null(&mut self, key: impl Into<String>) {
        self.0.insert(key.into(), None);
    }

    /// Drop any override for `key`, returning it.
    pub fn remove(&mut self, key: &str) -> Option<TabOverride> {
        self.0.shift_remove(key).flatten()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&TabOverride>)> {
        self.0
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, TabOverride)> for OverrideTree {
    fn from_iter<I: IntoIterator<Item = (String, TabOverride)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key, Some(value)))
                .collect(),
        )
    }
}

impl From<ContentTree> for OverrideTree {
    fn from(tree: ContentTree) -> Self {
        tree.0
            .into_iter()
            .map(|(key, content)| (key, TabOverride::from(content)))
            .collect()
    }
}
