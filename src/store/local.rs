//! Namespaced local persistence.
//!
//! The browser-portal ancestry of this store shows in its shape: each key
//! under the `classbook_` namespace holds one JSON-serialized entity
//! collection, persisted as `<key>.json` in the data directory. Reads of
//! missing or corrupt files yield an empty collection — the UI must render
//! an empty state, never crash on bad local data. Concurrent writers
//! (another process on the same data dir) race with last-writer-wins
//! semantics; that is the documented policy, not a bug.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Prefix shared by every key this store recognizes.
pub const NAMESPACE: &str = "classbook_";

/// Well-known collection keys.
pub mod keys {
    pub const USERS: &str = "classbook_users";
    pub const COURSES: &str = "classbook_courses";
    pub const APPOINTMENTS: &str = "classbook_appointments";
    pub const NOTIFICATIONS: &str = "classbook_notifications";
    pub const MESSAGES: &str = "classbook_messages";
    pub const TIME_LOGS: &str = "classbook_time_logs";
    pub const LEAVE_REQUESTS: &str = "classbook_leave_requests";
    pub const CALENDAR_EVENTS: &str = "classbook_calendar_events";
    pub const MATERIALS: &str = "classbook_materials";
}

/// Errors that can occur on local store writes. Reads never fail.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to write '{key}': {source}")]
    Write {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// File-backed key-value store for entity collections.
#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The data directory backing this store.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Namespace test shared with the storage watcher: only keys under the
    /// recognized namespace participate in change signaling.
    pub fn is_namespaced(key: &str) -> bool {
        key.starts_with(NAMESPACE)
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// True if the collection has ever been written.
    pub fn exists(&self, key: &str) -> bool {
        self.path(key).exists()
    }

    /// Loads a collection. Missing files are an empty collection; corrupt
    /// files are logged and treated as empty.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let path = self.path(key);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!("failed to read '{}': {}", key, e);
                return Vec::new();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!("discarding corrupt collection '{}': {}", key, e);
                Vec::new()
            }
        }
    }

    /// Replaces a collection.
    pub fn put<T: Serialize>(&self, key: &str, items: &[T]) -> Result<(), StoreError> {
        debug_assert!(Self::is_namespaced(key), "key outside classbook namespace");

        std::fs::create_dir_all(&self.dir).map_err(|e| StoreError::Write {
            key: key.to_string(),
            source: e,
        })?;

        let json = serde_json::to_vec_pretty(items).map_err(|e| StoreError::Serialize {
            key: key.to_string(),
            source: e,
        })?;

        std::fs::write(self.path(key), json).map_err(|e| StoreError::Write {
            key: key.to_string(),
            source: e,
        })
    }

    /// Read-modify-write helper for in-place collection edits.
    pub fn update<T, F>(&self, key: &str, f: F) -> Result<(), StoreError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut Vec<T>),
    {
        let mut items: Vec<T> = self.get(key);
        f(&mut items);
        self.put(key, &items)
    }

    /// Appends one record to a collection.
    pub fn append<T: Serialize + DeserializeOwned>(
        &self,
        key: &str,
        item: T,
    ) -> Result<(), StoreError> {
        self.update(key, |items: &mut Vec<T>| items.push(item))
    }

    /// Deletes a collection entirely.
    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        match std::fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Write {
                key: key.to_string(),
                source: e,
            }),
        }
    }
}
