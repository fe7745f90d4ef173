//! Cross-process storage change detection.
//!
//! The portal ancestor of this layer relied on the browser firing storage
//! events in *other* tabs when a namespaced key changed. Outside a browser
//! the equivalent is watching the local store's directory: a scan interval
//! compares file modification times and fires the change signal when a
//! collection under the `classbook_` namespace was written or removed by
//! someone else. Files outside the namespace never trigger a refresh.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use crate::store::LocalStore;

use super::signal::ChangeSignal;
use super::subscription::TaskHandle;

/// Default scan interval, matching the seconds-level staleness the sync
/// layer documents.
pub const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_secs(2);

/// Spawns a watcher over the store's data directory. The first scan only
/// records a baseline; signals fire for subsequent changes.
pub fn spawn_storage_watcher(
    store: &LocalStore,
    signal: ChangeSignal,
    scan_interval: Duration,
) -> TaskHandle {
    let dir = store.dir().to_path_buf();

    let task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(scan_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        let mut seen: HashMap<PathBuf, SystemTime> = HashMap::new();
        let mut baselined = false;

        loop {
            interval.tick().await;

            let current = scan(&dir);
            if baselined && changed(&seen, &current) {
                signal.notify();
            }
            seen = current;
            baselined = true;
        }
    });

    TaskHandle::new(task)
}

/// Collects mtimes for namespaced collection files in the data directory.
fn scan(dir: &PathBuf) -> HashMap<PathBuf, SystemTime> {
    let mut found = HashMap::new();

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        // Store not created yet; nothing to watch
        Err(_) => return found,
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if !is_watched(&path) {
            continue;
        }
        if let Ok(meta) = entry.metadata() {
            if let Ok(mtime) = meta.modified() {
                found.insert(path, mtime);
            }
        }
    }

    found
}

/// A file participates in change signaling iff its stem is a namespaced key.
fn is_watched(path: &std::path::Path) -> bool {
    if path.extension().and_then(|e| e.to_str()) != Some("json") {
        return false;
    }
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(LocalStore::is_namespaced)
        .unwrap_or(false)
}

fn changed(before: &HashMap<PathBuf, SystemTime>, after: &HashMap<PathBuf, SystemTime>) -> bool {
    if before.len() != after.len() {
        return true;
    }
    after
        .iter()
        .any(|(path, mtime)| before.get(path) != Some(mtime))
}
