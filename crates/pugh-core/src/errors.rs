//! Cross-cutting error types for Pugh.
//!
//! Errors raised while building events or validating command input. Storage
//! and persistence errors live in `pugh-store`; the CLI converges everything
//! into `anyhow`.

use thiserror::Error;

/// Errors that can be raised by any Pugh crate while validating input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A required identifier was empty.
    #[error("Missing identifier: {field} must not be empty")]
    MissingId { field: &'static str },

    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// Data failed validation (format, bounds, constraints).
    #[error("Validation error: {0}")]
    Validation(String),
}

impl CoreError {
    /// Reject `value` when it is empty, naming the offending field.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MissingId`] if `value` is empty or whitespace.
    pub fn require_id(field: &'static str, value: &str) -> Result<(), Self> {
        if value.trim().is_empty() {
            return Err(Self::MissingId { field });
        }
        Ok(())
    }
}
