//! Error taxonomy shared across the crate.

use thiserror::Error;
use uuid::Uuid;

use crate::models::Role;
use crate::store::StoreError;

pub type Result<T> = std::result::Result<T, Error>;

/// Every failure a facade operation can surface.
#[derive(Debug, Error)]
pub enum Error {
    /// The record failed a shape or content check before any write.
    #[error("{0}")]
    Validation(String),

    /// The remote API was unreachable or answered with a failure status.
    #[error("{0}")]
    Network(String),

    /// The acting role may not create accounts of the target role.
    #[error("{actor} is not allowed to create {target} accounts")]
    Authorization { actor: Role, target: Role },

    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: Uuid },

    /// A unique field collided with an existing record.
    #[error("a record with {field} '{value}' already exists")]
    Duplicate { field: &'static str, value: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl Error {
    /// True for failures worth retrying on the next poll; validation,
    /// authorization, and lookup failures are final.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Network(_))
    }
}
