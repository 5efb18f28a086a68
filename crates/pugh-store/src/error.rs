//! Error types for pugh-store.

use pugh_core::CoreError;
use thiserror::Error;

/// Errors from store commands and loads.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A command failed validation; nothing was appended.
    #[error("Command rejected: {0}")]
    Rejected(#[from] CoreError),

    /// The persistence backend failed.
    #[error("Persistence failed: {0}")]
    Persistence(#[from] PersistError),

    /// The registry could not be encoded or decoded.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised by a [`crate::persist::Persister`] backend.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Backend-specific failure that is not plain I/O.
    #[error("Backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Shorthand for a validation rejection.
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::Rejected(CoreError::Validation(message.into()))
    }
}
