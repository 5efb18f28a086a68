//! Criterion commands.

use pugh_core::ids::PREFIX_CRITERION;
use pugh_core::scale::Scale;
use pugh_core::{Event, EventKind};

use super::{require_criterion, require_label};
use crate::error::StoreError;
use crate::store::PughStore;

impl PughStore {
    /// Add a criterion with a fresh `cri_*` id. Its weight starts at 10.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Rejected`] for a blank label.
    pub fn add_criterion(
        &mut self,
        label: &str,
        scale: Option<Scale>,
    ) -> Result<String, StoreError> {
        self.catch_up();
        require_label("criterion label", label)?;
        let id = self.new_id(PREFIX_CRITERION);
        self.add_criterion_with_id(&id, label, scale)?;
        Ok(id)
    }

    /// Add a criterion under a caller-chosen id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Rejected`] for an empty id, blank label, or an id
    /// already present in the active branch.
    pub fn add_criterion_with_id(
        &mut self,
        id: &str,
        label: &str,
        scale: Option<Scale>,
    ) -> Result<String, StoreError> {
        self.catch_up();
        require_label("criterion label", label)?;
        if self.snapshot().criterion(id).is_some() {
            return Err(StoreError::invalid(format!("criterion {id} already exists")));
        }
        self.dispatch(EventKind::criterion_added(id, label, scale)?)?;
        Ok(id.to_string())
    }

    /// # Errors
    ///
    /// Returns [`StoreError::Rejected`] for an unknown criterion or blank label.
    pub fn rename_criterion(&mut self, id: &str, label: &str) -> Result<Event, StoreError> {
        self.catch_up();
        require_criterion(self.snapshot(), id)?;
        require_label("criterion label", label)?;
        self.dispatch(EventKind::criterion_renamed(id, label)?)
    }

    /// Remove a criterion, its weight, and every entry scored against it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Rejected`] for an unknown criterion.
    pub fn remove_criterion(&mut self, id: &str) -> Result<Event, StoreError> {
        self.catch_up();
        require_criterion(self.snapshot(), id)?;
        self.dispatch(EventKind::criterion_removed(id)?)
    }

    /// Move a criterion to `position`; out-of-range positions are clamped.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Rejected`] for an unknown criterion.
    pub fn reorder_criterion(&mut self, id: &str, position: i64) -> Result<Event, StoreError> {
        self.catch_up();
        require_criterion(self.snapshot(), id)?;
        self.dispatch(EventKind::criterion_reordered(id, position)?)
    }

    /// # Errors
    ///
    /// Returns [`StoreError::Rejected`] for an unknown criterion.
    pub fn set_criterion_scale(&mut self, id: &str, scale: Scale) -> Result<Event, StoreError> {
        self.catch_up();
        require_criterion(self.snapshot(), id)?;
        self.dispatch(EventKind::criterion_scale_overridden(id, scale)?)
    }

    /// # Errors
    ///
    /// Returns [`StoreError::Rejected`] for an unknown criterion.
    pub fn describe_criterion(&mut self, id: &str, description: &str) -> Result<Event, StoreError> {
        self.catch_up();
        require_criterion(self.snapshot(), id)?;
        self.dispatch(EventKind::criterion_description_changed(id, description)?)
    }

    /// Set a criterion's weight within the configured [`crate::WeightPolicy`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Rejected`] for an unknown criterion or a weight
    /// outside the policy.
    pub fn set_weight(&mut self, id: &str, weight: i64) -> Result<Event, StoreError> {
        self.catch_up();
        require_criterion(self.snapshot(), id)?;
        self.options().weights.check(weight)?;
        self.dispatch(EventKind::criterion_weight_adjusted(id, weight)?)
    }
}
