//! Content editor: a validated read-modify-write cycle over one tab.
//!
//! The editor keeps a working copy of the override tree. Submitting a valid
//! form writes the tab into the working copy and asks the
//! [`ContentStore`] to persist the whole tree; the working copy keeps the
//! edit for this session even when persisting fails.
//!
//! Like the rest of the crate's UI glue it follows The Elm Architecture:
//! every user action is an [`EditorMessage`] handled by
//! [`ContentEditor::update`].

mod form;
mod validate;

pub use form::{ContactField, ContactForm, EditorForm};
pub use validate::{ValidationError, validate};

use std::collections::BTreeSet;

use crate::content::{ContentTree, OverrideTree, TabContent, TabOverride, merge_content};
use crate::storage::KeyValueStorage;
use crate::store::ContentStore;

/// Where the current edit session stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorState {
    /// Form shows the current content of the selected tab
    Idle,
    /// Form has unsubmitted changes
    Editing,
    /// Last submit was validated and persisted
    Saved,
    /// Last submit was validated but could not be persisted
    SaveFailed,
    /// Last submit failed validation; nothing was written
    Rejected(ValidationError),
    /// Selected tab was restored from the persisted content
    Reset,
    /// Stored overrides were removed
    Cleared,
    /// Stored overrides could not be removed
    ClearFailed,
}

impl EditorState {
    /// Status line shown under the form.
    pub fn message(&self) -> String {
        match self {
            Self::Idle | Self::Editing => String::new(),
            Self::Saved => {
                "Preview updated. Your changes are stored and every open view of the site will pick them up."
                    .to_string()
            }
            Self::SaveFailed => {
                "Preview updated locally, but changes could not be saved for reuse.".to_string()
            }
            Self::Rejected(err) => err.to_string(),
            Self::Reset => "Form reset to the saved configuration.".to_string(),
            Self::Cleared => {
                "Stored changes removed. The manager now reflects the default configuration."
                    .to_string()
            }
            Self::ClearFailed => {
                "Unable to clear stored changes. Please check storage permissions.".to_string()
            }
        }
    }
}

/// User actions on the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMessage {
    /// Choose the tab to edit
    SelectTab(String),
    /// Replace the title input
    SetTitle(String),
    /// Replace the body text input
    SetBody(String),
    /// Replace one contact input
    SetContactField(ContactField, String),
    /// Validate and persist the form
    Submit,
    /// Discard edits to the selected tab
    Reset,
    /// Remove all stored overrides
    ClearStored,
    /// Another session changed the stored overrides
    ExternalChange,
}

/// Form-driven editor over a [`ContentStore`].
#[derive(Debug, Clone)]
pub struct ContentEditor {
    selected: String,
    form: EditorForm,
    working: OverrideTree,
    /// Tabs whose working-copy entry never reached storage
    unsaved: BTreeSet<String>,
    state: EditorState,
}

impl ContentEditor {
    /// Start a session on the first tab of the store.
    pub fn new<S: KeyValueStorage>(store: &ContentStore<S>) -> Self {
        let selected = store
            .effective()
            .keys()
            .next()
            .unwrap_or_default()
            .to_string();
        let mut editor = Self {
            selected,
            form: EditorForm::default(),
            working: store.overrides().clone(),
            unsaved: BTreeSet::new(),
            state: EditorState::Idle,
        };
        editor.sync_form(store.defaults());
        editor
    }

    pub fn selected_tab(&self) -> &str {
        &self.selected
    }

    pub const fn form(&self) -> &EditorForm {
        &self.form
    }

    pub const fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn status_message(&self) -> String {
        self.state.message()
    }

    /// Overrides edited in this session, persisted or not.
    pub const fn working_copy(&self) -> &OverrideTree {
        &self.working
    }

    /// Defaults merged with this session's working copy.
    pub fn preview(&self, defaults: &ContentTree) -> ContentTree {
        merge_content(defaults, &self.working)
    }

    /// Handle one user action.
    pub fn update<S: KeyValueStorage>(&mut self, store: &mut ContentStore<S>, msg: EditorMessage) {
        match msg {
            EditorMessage::SelectTab(key) => {
                self.selected = key;
                self.sync_form(store.defaults());
                self.state = EditorState::Idle;
            }
            EditorMessage::SetTitle(title) => {
                self.form.title = title;
                self.state = EditorState::Editing;
            }
            EditorMessage::SetBody(body) => {
                self.form.body = body;
                self.state = EditorState::Editing;
            }
            EditorMessage::SetContactField(field, value) => {
                // Ignored outside the contact tab, where the fieldset is hidden.
                if let Some(contact) = self.form.contact.as_mut() {
                    *contact.field_mut(field) = value;
                    self.state = EditorState::Editing;
                }
            }
            EditorMessage::Submit => self.submit(store),
            EditorMessage::Reset => {
                match store.overrides().get(&self.selected) {
                    Some(persisted) => self.working.insert(self.selected.clone(), persisted.clone()),
                    None => {
                        self.working.remove(&self.selected);
                    }
                }
                self.unsaved.remove(&self.selected);
                self.sync_form(store.defaults());
                self.state = EditorState::Reset;
            }
            EditorMessage::ClearStored => {
                if store.clear_overrides() {
                    self.working = OverrideTree::new();
                    self.unsaved.clear();
                    self.sync_form(store.defaults());
                    self.state = EditorState::Cleared;
                } else {
                    self.state = EditorState::ClearFailed;
                }
            }
            EditorMessage::ExternalChange => {
                self.working = self.rebased(store.overrides());
                // Unsubmitted input wins over a concurrent change elsewhere.
                if !self.has_draft() {
                    self.sync_form(store.defaults());
                }
            }
        }
    }

    fn submit<S: KeyValueStorage>(&mut self, store: &mut ContentStore<S>) {
        let current = self.current_tab(store.defaults());
        let content = match validate(&self.selected, &self.form, current.as_ref()) {
            Ok(content) => content,
            Err(err) => {
                tracing::debug!(tab = %self.selected, error = %err, "edit rejected");
                self.state = EditorState::Rejected(err);
                return;
            }
        };

        // Other sessions' saved tabs are kept as storage holds them.
        let mut next_tree = self.rebased(store.overrides());
        let previous = next_tree.get(&self.selected).cloned().unwrap_or_default();
        let next = TabOverride {
            store: previous.store,
            extra: previous.extra,
            ..TabOverride::from(content)
        };
        next_tree.insert(self.selected.clone(), next);

        let saved = store.save_overrides(&next_tree);
        self.working = next_tree;
        if saved {
            self.unsaved.clear();
            self.state = EditorState::Saved;
        } else {
            self.unsaved.insert(self.selected.clone());
            self.state = EditorState::SaveFailed;
        }
        self.sync_form(store.defaults());
    }

    /// `persisted` with this session's unsaved tab edits laid over it.
    fn rebased(&self, persisted: &OverrideTree) -> OverrideTree {
        let mut tree = persisted.clone();
        for key in &self.unsaved {
            match self.working.get(key) {
                Some(entry) => tree.insert(key.clone(), entry.clone()),
                None => {
                    tree.remove(key);
                }
            }
        }
        tree
    }

    /// Whether the form holds input that was never accepted.
    const fn has_draft(&self) -> bool {
        matches!(self.state, EditorState::Editing | EditorState::Rejected(_))
    }

    /// The selected tab as the working copy currently has it.
    fn current_tab(&self, defaults: &ContentTree) -> Option<TabContent> {
        let patch = self.working.get(&self.selected);
        match (defaults.get(&self.selected), patch) {
            (Some(default), Some(patch)) => Some(default.merged_with(patch)),
            (Some(default), None) => Some(default.clone()),
            (None, Some(patch)) => Some(TabContent::default().merged_with(patch)),
            (None, None) => None,
        }
    }

    fn sync_form(&mut self, defaults: &ContentTree) {
        let current = self.current_tab(defaults);
        self.form = EditorForm::from_tab(&self.selected, current.as_ref());
    }
}
