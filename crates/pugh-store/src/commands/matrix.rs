//! Matrix-level metadata and scoring configuration.

use pugh_core::scale::Scale;
use pugh_core::{Event, EventKind};

use super::require_label;
use crate::error::StoreError;
use crate::store::PughStore;

impl PughStore {
    /// Set title, description and scoring configuration in one event.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Rejected`] for a blank title.
    pub fn create_matrix(
        &mut self,
        title: &str,
        description: Option<&str>,
        allow_negative: bool,
        default_scale: Scale,
    ) -> Result<Event, StoreError> {
        self.catch_up();
        require_label("matrix title", title)?;
        self.dispatch(EventKind::matrix_created(
            title,
            description.map(str::to_string),
            allow_negative,
            default_scale,
        ))
    }

    /// Change the scale used by criteria without their own.
    ///
    /// # Errors
    ///
    /// Returns an error only if the event cannot be stamped.
    pub fn set_default_scale(&mut self, scale: Scale) -> Result<Event, StoreError> {
        self.catch_up();
        self.dispatch(EventKind::matrix_default_scale_set(scale))
    }

    /// # Errors
    ///
    /// Returns [`StoreError::Rejected`] for a blank title.
    pub fn set_matrix_title(&mut self, title: &str) -> Result<Event, StoreError> {
        self.catch_up();
        require_label("matrix title", title)?;
        self.dispatch(EventKind::matrix_title_changed(title))
    }

    /// # Errors
    ///
    /// Returns an error only if the event cannot be stamped.
    pub fn set_matrix_description(&mut self, description: &str) -> Result<Event, StoreError> {
        self.catch_up();
        self.dispatch(EventKind::matrix_description_changed(description))
    }

    /// Mark the matrix archived. Archiving twice is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Rejected`] if the matrix is already archived.
    pub fn archive_matrix(&mut self) -> Result<Event, StoreError> {
        self.catch_up();
        if self.snapshot().matrix.archived {
            return Err(StoreError::invalid("matrix is already archived"));
        }
        self.dispatch(EventKind::matrix_archived())
    }
}
