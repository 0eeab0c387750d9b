//! Storage change notification.
//!
//! Watches the file behind a [`FileStorage`] key so that a session notices
//! when another process saves or clears overrides. Uses notify crate for
//! cross-platform file system events; the event loop polls
//! [`StorageWatcher::take_change_ready`] and forwards the key to
//! [`crate::store::ContentStore::handle_external_change`].
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::storage::{FileStorage, StorageError};

/// Failure to start watching a storage key.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("cannot prepare storage directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("file watcher failed: {0}")]
    Notify(#[from] notify::Error),
}

/// Watches one storage key and emits debounced change notifications.
pub struct StorageWatcher {
    _watcher: RecommendedWatcher,
    rx: Receiver<notify::Result<Event>>,
    key: String,
    watch_root: PathBuf,
    target_path: PathBuf,
    target_name: Option<OsString>,
    debounce: Duration,
    pending_since: Option<Instant>,
}

impl StorageWatcher {
    /// Watch `key` in `storage`.
    ///
    /// The storage directory is created if needed, since only existing
    /// directories can be watched.
    ///
    /// # Errors
    /// Returns an error if the key is invalid, the directory cannot be
    /// created, or the watcher cannot be installed.
    pub fn new(storage: &FileStorage, key: &str, debounce: Duration) -> Result<Self, WatchError> {
        let path = storage.path_for(key)?;
        std::fs::create_dir_all(storage.dir()).map_err(|source| WatchError::Directory {
            path: storage.dir().to_path_buf(),
            source,
        })?;
        // Event paths from the OS are absolute and canonical.
        let watch_root = storage
            .dir()
            .canonicalize()
            .unwrap_or_else(|_| storage.dir().to_path_buf());
        let target_name = path.file_name().map(std::ffi::OsStr::to_os_string);
        let target_path = target_name
            .as_ref()
            .map_or_else(|| path.clone(), |name| watch_root.join(name));

        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })?;
        watcher.watch(&watch_root, RecursiveMode::NonRecursive)?;
        tracing::debug!(key, path = %target_path.display(), "watching storage key");

        Ok(Self {
            _watcher: watcher,
            rx,
            key: key.to_string(),
            watch_root,
            target_path,
            target_name,
            debounce,
            pending_since: None,
        })
    }

    /// The storage key being watched.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The canonical path of the file backing the key.
    pub fn target_path(&self) -> &Path {
        &self.target_path
    }

    /// Returns true once a debounced change is ready.
    pub fn take_change_ready(&mut self) -> bool {
        let mut saw_relevant_event = false;
        while let Ok(event) = self.rx.try_recv() {
            match event {
                Ok(ev) if self.is_relevant(&ev) => {
                    saw_relevant_event = true;
                }
                Ok(ev) => {
                    tracing::trace!(kind = ?ev.kind, paths = ?ev.paths, "ignoring storage event");
                }
                Err(err) => {
                    tracing::warn!(key = %self.key, error = %err, "storage watcher error");
                }
            }
        }

        if saw_relevant_event {
            self.pending_since = Some(Instant::now());
        }

        let Some(pending_since) = self.pending_since else {
            return false;
        };
        if pending_since.elapsed() >= self.debounce {
            self.pending_since = None;
            return true;
        }
        false
    }

    fn is_relevant(&self, event: &Event) -> bool {
        event.paths.iter().any(|path| {
            path == &self.watch_root
                || path == &self.target_path
                || self
                    .target_name
                    .as_ref()
                    .is_some_and(|name| path.file_name().is_some_and(|f| f == name))
        })
    }
}
