//! Content store: defaults, persisted overrides and the effective tree.
//!
//! One store instance exists per session. It loads overrides from a
//! [`KeyValueStorage`] at construction, keeps the effective tree in sync
//! with every successful save or clear, and re-derives it when another
//! session sharing the same storage changes the stored overrides.

use std::fmt;

use crate::content::{ContentTree, OverrideTree, TabContent, merge_content};
use crate::storage::{KeyValueStorage, OVERRIDES_KEY};

/// Handle returned by [`ContentStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&ContentTree)>;

/// Single source of truth for the effective content tree.
pub struct ContentStore<S> {
    storage: S,
    key: String,
    defaults: ContentTree,
    overrides: OverrideTree,
    effective: ContentTree,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl<S: KeyValueStorage> ContentStore<S> {
    /// Create a store over `defaults`, loading overrides from `storage`.
    pub fn new(defaults: ContentTree, storage: S) -> Self {
        Self::with_key(defaults, storage, OVERRIDES_KEY)
    }

    /// Like [`ContentStore::new`] but persisting under a custom key.
    pub fn with_key(defaults: ContentTree, storage: S, key: impl Into<String>) -> Self {
        let mut store = Self {
            storage,
            key: key.into(),
            effective: defaults.clone(),
            defaults,
            overrides: OverrideTree::new(),
            listeners: Vec::new(),
            next_subscription: 0,
        };
        store.overrides = store.load_overrides();
        store.effective = merge_content(&store.defaults, &store.overrides);
        tracing::debug!(
            key = %store.key,
            tabs = store.effective.len(),
            overridden = store.overrides.len(),
            "content store initialised"
        );
        store
    }

    /// Read the persisted override tree.
    ///
    /// Never fails: unreadable storage or malformed JSON yield an empty tree
    /// and a warning.
    pub fn load_overrides(&self) -> OverrideTree {
        self.read_overrides().unwrap_or_default()
    }

    /// Like [`ContentStore::load_overrides`], but `None` when the storage
    /// itself could not be read, as opposed to holding nothing usable.
    fn read_overrides(&self) -> Option<OverrideTree> {
        let stored = match self.storage.get(&self.key) {
            Ok(Some(stored)) => stored,
            Ok(None) => return Some(OverrideTree::new()),
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "unable to load stored overrides");
                return None;
            }
        };
        if stored.trim().is_empty() {
            return Some(OverrideTree::new());
        }
        match serde_json::from_str::<Option<OverrideTree>>(&stored) {
            Ok(tree) => Some(tree.unwrap_or_default()),
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "ignoring malformed stored overrides");
                Some(OverrideTree::new())
            }
        }
    }

    /// Persist `overrides` as the complete override tree.
    ///
    /// Returns `false` when serialization or storage fails; in that case
    /// neither the storage nor this store's state changes.
    pub fn save_overrides(&mut self, overrides: &OverrideTree) -> bool {
        let encoded = match serde_json::to_string(overrides) {
            Ok(encoded) => encoded,
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "unable to encode overrides");
                return false;
            }
        };
        if let Err(err) = self.storage.set(&self.key, &encoded) {
            tracing::warn!(key = %self.key, error = %err, "unable to persist overrides");
            return false;
        }
        self.overrides = overrides.clone();
        self.effective = merge_content(&self.defaults, &self.overrides);
        tracing::info!(key = %self.key, tabs = overrides.len(), "overrides saved");
        true
    }

    /// Delete the persisted override tree.
    ///
    /// On success the effective tree falls back to the defaults.
    pub fn clear_overrides(&mut self) -> bool {
        if let Err(err) = self.storage.remove(&self.key) {
            tracing::warn!(key = %self.key, error = %err, "unable to clear stored overrides");
            return false;
        }
        self.overrides = OverrideTree::new();
        self.effective = self.defaults.clone();
        tracing::info!(key = %self.key, "stored overrides cleared");
        true
    }

    /// React to a change made to the storage by another session.
    ///
    /// `key` is the changed storage key, `None` when the whole storage was
    /// wiped. Reloads the overrides and, if the effective tree changed,
    /// notifies every subscriber. Returns whether it changed. A failed read
    /// keeps the last loaded overrides.
    pub fn handle_external_change(&mut self, key: Option<&str>) -> bool {
        if key.is_some_and(|key| key != self.key) {
            return false;
        }
        let Some(overrides) = self.read_overrides() else {
            return false;
        };
        let effective = merge_content(&self.defaults, &overrides);
        self.overrides = overrides;
        if effective == self.effective {
            tracing::debug!(key = %self.key, "external change left content unchanged");
            return false;
        }
        self.effective = effective;
        tracing::debug!(
            key = %self.key,
            listeners = self.listeners.len(),
            "external change, notifying subscribers"
        );
        for (_, listener) in &mut self.listeners {
            listener(&self.effective);
        }
        true
    }

    /// Register a listener for external changes to the effective tree.
    pub fn subscribe(&mut self, listener: impl FnMut(&ContentTree) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }
}

impl<S> ContentStore<S> {
    /// The compiled default tree.
    pub const fn defaults(&self) -> &ContentTree {
        &self.defaults
    }

    /// The last successfully loaded or saved override tree.
    pub const fn overrides(&self) -> &OverrideTree {
        &self.overrides
    }

    /// Defaults merged with the persisted overrides.
    pub const fn effective(&self) -> &ContentTree {
        &self.effective
    }

    /// Effective content of one tab.
    pub fn tab(&self, key: &str) -> Option<&TabContent> {
        self.effective.get(key)
    }

    /// The storage key overrides are persisted under.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub const fn storage(&self) -> &S {
        &self.storage
    }
}

impl<S> fmt::Debug for ContentStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentStore")
            .field("key", &self.key)
            .field("tabs", &self.effective.len())
            .field("overrides", &self.overrides.len())
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}
