//! Physical stores behind the data access facade.
//!
//! Two stores exist: the remote JSON API ([`ApiClient`]) and the namespaced
//! local key-value store ([`LocalStore`]). The facade decides per entity
//! family which store is authoritative and when the local one serves as a
//! fallback.

mod api;
mod local;

pub use api::ApiClient;
pub use local::{keys, LocalStore, StoreError, NAMESPACE};
