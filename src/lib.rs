// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. content::ContentTree)
    clippy::module_name_repetitions
)]

//! # Tabpress
//!
//! Content manager for a multi-tab publishing site.
//!
//! Every tab (publishing, authors, self-publishing, bookstore, contact) has
//! compiled default content. Editors override individual tabs; overrides
//! are persisted as one JSON document and merged over the defaults to give
//! the effective content every page renders.
//!
//! ## Architecture
//!
//! The editor uses The Elm Architecture (TEA) pattern:
//! - **Model**: [`editor::ContentEditor`] form and working copy
//! - **Message**: [`editor::EditorMessage`]
//! - **Update**: [`editor::ContentEditor::update`] validates and persists
//! - **View**: [`render`] turns the effective tree into text
//!
//! ## Modules
//!
//! - [`content`]: Content model and the override merge
//! - [`body`]: Body text to blocks and back
//! - [`storage`]: Key-value persistence backends
//! - [`store`]: Effective content and change notification
//! - [`editor`]: Validated editing of one tab
//! - [`contact`]: Contact details, links and form relay
//! - [`defaults`]: Built-in defaults and the page-script format
//! - [`render`]: Terminal rendering
//! - [`watcher`]: Storage file watching
//! - [`config`]: Saved command-line defaults

pub mod body;
pub mod config;
pub mod contact;
pub mod content;
pub mod defaults;
pub mod editor;
pub mod render;
pub mod storage;
pub mod store;
pub mod watcher;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::content::{Block, ContactDetails, ContentTree, OverrideTree, TabContent};
    pub use crate::editor::{ContentEditor, EditorMessage, EditorState};
    pub use crate::storage::{FileStorage, KeyValueStorage, MemoryStorage};
    pub use crate::store::ContentStore;
}
