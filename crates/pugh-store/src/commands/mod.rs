//! Command API, one module per entity. Each command first applies any
//! pending external change, validates its input against the fresh state, then
//! goes through [`crate::PughStore`]'s dispatch sequence.

mod branch;
mod criterion;
mod matrix;
mod option;
mod rating;

pub use rating::RatingDraft;

use pugh_core::{CoreError, MatrixSnapshot};

use crate::error::StoreError;

/// Reject a blank display label.
fn require_label(field: &str, label: &str) -> Result<(), StoreError> {
    if label.trim().is_empty() {
        return Err(StoreError::invalid(format!("{field} must not be empty")));
    }
    Ok(())
}

fn require_criterion(snapshot: &MatrixSnapshot, id: &str) -> Result<(), StoreError> {
    CoreError::require_id("criterion_id", id)?;
    if snapshot.criterion(id).is_none() {
        return Err(CoreError::NotFound {
            entity_type: "criterion".into(),
            id: id.into(),
        }
        .into());
    }
    Ok(())
}

fn require_option(snapshot: &MatrixSnapshot, id: &str) -> Result<(), StoreError> {
    CoreError::require_id("option_id", id)?;
    if snapshot.option(id).is_none() {
        return Err(CoreError::NotFound {
            entity_type: "option".into(),
            id: id.into(),
        }
        .into());
    }
    Ok(())
}
