//! Refresh subscriptions with trailing-edge coalescing.
//!
//! A subscription re-runs its refresh callback whenever the change signal
//! fires or (optionally) a fixed poll interval elapses. Refreshes never
//! overlap: triggers that arrive while a refresh is in flight are collapsed
//! into exactly one follow-up refresh once the current one completes, so a
//! burst of mutations cannot stack unbounded concurrent fetches.

use std::future::Future;
use std::time::Duration;

use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::task::JoinHandle;
use tokio::time::{Interval, MissedTickBehavior};

use super::signal::ChangeSignal;

/// Owner of a background sync task. The task is aborted on `stop()` or when
/// the handle is dropped — every registration has a matching teardown.
#[derive(Debug)]
pub struct TaskHandle {
    inner: JoinHandle<()>,
}

impl TaskHandle {
    pub(crate) fn new(inner: JoinHandle<()>) -> Self {
        Self { inner }
    }

    /// Tears the task down immediately.
    pub fn stop(&self) {
        self.inner.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.inner.abort();
    }
}

/// Spawns a refresh subscription.
///
/// The callback runs once immediately when a poll interval is configured
/// (the first tick of a `tokio` interval is immediate), then on every
/// trigger. With `poll_interval: None` only the change signal drives it.
pub fn subscribe<F, Fut>(
    signal: &ChangeSignal,
    poll_interval: Option<Duration>,
    mut refresh: F,
) -> TaskHandle
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send,
{
    let mut rx = signal.subscribe();
    let mut poll = poll_interval.map(|period| {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval
    });

    let task = tokio::spawn(async move {
        loop {
            // idle: wait for any trigger
            tokio::select! {
                received = rx.recv() => match received {
                    Ok(()) | Err(RecvError::Lagged(_)) => {}
                    Err(RecvError::Closed) => {
                        if poll.is_none() {
                            break;
                        }
                        // Signal gone but polling still drives refreshes.
                        poll_tick(&mut poll).await;
                    }
                },
                _ = poll_tick(&mut poll), if poll.is_some() => {}
            }

            // refreshing, with trailing-edge coalescing
            refresh().await;
            while drain_triggers(&mut rx) {
                refresh().await;
            }
        }
    });

    TaskHandle::new(task)
}

async fn poll_tick(poll: &mut Option<Interval>) {
    match poll {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

/// Consumes every trigger that accumulated during a refresh. Returns true
/// if at least one arrived, i.e. one more refresh is owed.
fn drain_triggers(rx: &mut tokio::sync::broadcast::Receiver<()>) -> bool {
    let mut pending = false;
    loop {
        match rx.try_recv() {
            Ok(()) | Err(TryRecvError::Lagged(_)) => pending = true,
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
        }
    }
    pending
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_signal_triggers_refresh() {
        let signal = ChangeSignal::new();
        let count = Arc::new(AtomicUsize::new(0));

        let counter = count.clone();
        let _handle = subscribe(&signal, None, move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        signal.notify();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_rapid_triggers_coalesce() {
        let signal = ChangeSignal::new();
        let count = Arc::new(AtomicUsize::new(0));

        let counter = count.clone();
        let _handle = subscribe(&signal, None, move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                // Slow refresh so follow-up triggers land mid-flight
                tokio::time::sleep(Duration::from_millis(150)).await;
            }
        });

        signal.notify();
        tokio::time::sleep(Duration::from_millis(50)).await;
        // These all arrive while the first refresh is still running
        for _ in 0..10 {
            signal.notify();
        }

        tokio::time::sleep(Duration::from_millis(500)).await;
        // One initial refresh plus exactly one trailing refresh
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_polling_refreshes_without_signal() {
        let signal = ChangeSignal::new();
        let count = Arc::new(AtomicUsize::new(0));

        let counter = count.clone();
        let _handle = subscribe(&signal, Some(Duration::from_millis(50)), move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_millis(220)).await;
        // Immediate first tick plus several interval ticks
        assert!(count.load(Ordering::SeqCst) >= 3);
    }

    #[tokio::test]
    async fn test_stop_tears_down() {
        let signal = ChangeSignal::new();
        let count = Arc::new(AtomicUsize::new(0));

        let counter = count.clone();
        let handle = subscribe(&signal, None, move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        handle.stop();
        tokio::time::sleep(Duration::from_millis(50)).await;

        signal.notify();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert!(handle.is_finished());
    }

    #[tokio::test]
    async fn test_drop_tears_down() {
        let signal = ChangeSignal::new();
        let count = Arc::new(AtomicUsize::new(0));

        let counter = count.clone();
        let handle = subscribe(&signal, None, move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });
        drop(handle);
        tokio::time::sleep(Duration::from_millis(50)).await;

        signal.notify();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
