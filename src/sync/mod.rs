//! Synchronization layer.
//!
//! Three mechanisms keep views current:
//!
//! - the in-process [`ChangeSignal`], fired after every facade mutation,
//! - the storage [`watcher`](spawn_storage_watcher), which detects writes
//!   from other processes sharing the data directory,
//! - optional interval polling inside a [`subscribe`] subscription.
//!
//! All background work is owned by a [`TaskHandle`]; dropping it tears the
//! task down, so every registration has a matching cleanup. The
//! [completion sweep](spawn_completion_sweep) rides the same handle type.

mod signal;
mod subscription;
mod sweep;
mod watcher;

pub use signal::ChangeSignal;
pub use subscription::{subscribe, TaskHandle};
pub use sweep::{run_sweep, spawn_completion_sweep, DEFAULT_SWEEP_INTERVAL};
pub use watcher::{spawn_storage_watcher, DEFAULT_SCAN_INTERVAL};
