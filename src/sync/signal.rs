//! In-process "data changed" signal.
//!
//! The facade dispatches this signal after every successful mutation; any
//! number of subscriptions listen for it. The signal carries no payload —
//! consumers re-fetch whatever they depend on.

use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 64;

/// Broadcast handle for change notifications. Cheap to clone; all clones
/// share the same channel.
#[derive(Debug, Clone)]
pub struct ChangeSignal {
    tx: broadcast::Sender<()>,
}

impl ChangeSignal {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Announces that some collection changed. A signal with no listeners
    /// is not an error.
    pub fn notify(&self) {
        let _ = self.tx.send(());
    }

    /// Opens a new listener. Lagged receivers see a `Lagged` error rather
    /// than missing the fact that something changed, which subscriptions
    /// treat as a trigger.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Number of live listeners, used by tests and diagnostics.
    pub fn listener_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ChangeSignal {
    fn default() -> Self {
        Self::new()
    }
}
