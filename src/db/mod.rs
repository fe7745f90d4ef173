//! Data access facade.
//!
//! [`Database`] is the single interface through which callers read and
//! write domain entities. It hides two physical stores: the remote JSON
//! API (authoritative where an endpoint exists) and the namespaced local
//! store (fallback, cache, and sole home of entities without a live
//! endpoint). The facade is constructed explicitly and passed around —
//! there is no module-level singleton — and it performs no role checks on
//! status transitions; those remain the caller's responsibility.
//!
//! Every successful mutation dispatches the change signal so subscribed
//! views re-fetch. Remote list results are mirrored into the local store,
//! keeping the offline fallback warm.

mod analytics;
mod appointments;
mod calendar;
mod courses;
mod messages;
mod notifications;
mod timesheets;
mod users;

pub use analytics::{StudentAnalytics, SystemAnalytics, TrainerAnalytics};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::Config;
use crate::error::Result;
use crate::notify::NotificationService;
use crate::store::{ApiClient, LocalStore};
use crate::sync::ChangeSignal;

/// The data access facade. Cheap to clone; clones share the change signal
/// and delivery channels, so background tasks can hold their own copy.
#[derive(Debug, Clone)]
pub struct Database {
    api: Option<ApiClient>,
    local: LocalStore,
    signal: ChangeSignal,
    notifier: NotificationService,
}

impl Database {
    /// Builds a facade with explicit stores. Passing `None` for the API
    /// client yields a local-only facade, used for entities without live
    /// endpoints and in tests.
    pub fn new(
        api: Option<ApiClient>,
        local: LocalStore,
        signal: ChangeSignal,
        notifier: NotificationService,
    ) -> Self {
        Self {
            api,
            local,
            signal,
            notifier,
        }
    }

    /// Builds a facade from configuration: remote client when `api_url` is
    /// set, local store in the configured data directory.
    pub fn from_config(config: &Config) -> Self {
        let api = config.api_url.as_ref().map(|url| {
            let client = ApiClient::new(url.clone());
            match &config.api_token {
                Some(token) => client.with_token(token.clone()),
                None => client,
            }
        });

        Self {
            api,
            local: LocalStore::new(config.data_dir.clone()),
            signal: ChangeSignal::new(),
            notifier: NotificationService::from_config(config),
        }
    }

    pub fn local(&self) -> &LocalStore {
        &self.local
    }

    pub fn signal(&self) -> &ChangeSignal {
        &self.signal
    }

    pub(crate) fn api(&self) -> Option<&ApiClient> {
        self.api.as_ref()
    }

    pub(crate) fn notifier(&self) -> &NotificationService {
        &self.notifier
    }

    /// Dispatched after every successful mutation.
    pub(crate) fn changed(&self) {
        self.signal.notify();
    }

    /// Remote list with local mirror and fallback.
    ///
    /// On success the result is mirrored into the local store so the
    /// fallback stays warm (mirror failures are logged, not fatal). On a
    /// network failure the local collection is served if it was ever
    /// written; otherwise the error propagates. Without an API client the
    /// local collection is authoritative.
    pub(crate) async fn fetch_or_local<T>(&self, path: &str, key: &str) -> Result<Vec<T>>
    where
        T: Serialize + DeserializeOwned,
    {
        let api = match &self.api {
            Some(api) => api,
            None => return Ok(self.local.get(key)),
        };

        match api.get::<Vec<T>>(path).await {
            Ok(items) => {
                if let Err(e) = self.local.put(key, &items) {
                    tracing::warn!("failed to mirror '{}' locally: {}", key, e);
                }
                Ok(items)
            }
            Err(e) if self.local.exists(key) => {
                tracing::warn!("API fetch {} failed, using local fallback: {}", path, e);
                Ok(self.local.get(key))
            }
            Err(e) => Err(e),
        }
    }

    /// Best-effort remote mirror of a local-first mutation. Failures are
    /// logged and swallowed; the local write already succeeded.
    pub(crate) async fn mirror_remote<B: Serialize>(&self, path: &str, body: &B) {
        if let Some(api) = &self.api {
            if let Err(e) = api.post(path, body).await {
                tracing::warn!("API mirror {} failed, kept local: {}", path, e);
            }
        }
    }
}
