//! Option commands.

use pugh_core::ids::PREFIX_OPTION;
use pugh_core::{Event, EventKind};

use super::{require_label, require_option};
use crate::error::StoreError;
use crate::store::PughStore;

impl PughStore {
    /// Add an option with a fresh `opt_*` id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Rejected`] for a blank label.
    pub fn add_option(&mut self, label: &str) -> Result<String, StoreError> {
        self.catch_up();
        require_label("option label", label)?;
        let id = self.new_id(PREFIX_OPTION);
        self.add_option_with_id(&id, label)
    }

    /// # Errors
    ///
    /// Returns [`StoreError::Rejected`] for an empty id, blank label, or an id
    /// already present in the active branch.
    pub fn add_option_with_id(&mut self, id: &str, label: &str) -> Result<String, StoreError> {
        self.catch_up();
        require_label("option label", label)?;
        if self.snapshot().option(id).is_some() {
            return Err(StoreError::invalid(format!("option {id} already exists")));
        }
        self.dispatch(EventKind::option_added(id, label)?)?;
        Ok(id.to_string())
    }

    /// # Errors
    ///
    /// Returns [`StoreError::Rejected`] for an unknown option or blank label.
    pub fn rename_option(&mut self, id: &str, label: &str) -> Result<Event, StoreError> {
        self.catch_up();
        require_option(self.snapshot(), id)?;
        require_label("option label", label)?;
        self.dispatch(EventKind::option_renamed(id, label)?)
    }

    /// Remove an option and every entry recorded against it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Rejected`] for an unknown option.
    pub fn remove_option(&mut self, id: &str) -> Result<Event, StoreError> {
        self.catch_up();
        require_option(self.snapshot(), id)?;
        self.dispatch(EventKind::option_removed(id)?)
    }

    /// # Errors
    ///
    /// Returns [`StoreError::Rejected`] for an unknown option.
    pub fn reorder_option(&mut self, id: &str, position: i64) -> Result<Event, StoreError> {
        self.catch_up();
        require_option(self.snapshot(), id)?;
        self.dispatch(EventKind::option_reordered(id, position)?)
    }

    /// # Errors
    ///
    /// Returns [`StoreError::Rejected`] for an unknown option.
    pub fn describe_option(&mut self, id: &str, description: &str) -> Result<Event, StoreError> {
        self.catch_up();
        require_option(self.snapshot(), id)?;
        self.dispatch(EventKind::option_description_changed(id, description)?)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_support::helpers::test_store;

    #[test]
    fn option_lifecycle() {
        let mut store = test_store();
        let react = store.add_option("React").unwrap();
        let vue = store.add_option("Vue").unwrap();
        assert!(react.starts_with("opt_"));

        store.rename_option(&vue, "Vue 3").unwrap();
        store.describe_option(&vue, "composition api").unwrap();
        store.reorder_option(&vue, -3).unwrap();

        let snap = store.snapshot();
        assert_eq!(snap.options[0].label, "Vue 3");
        assert_eq!(snap.options[0].description.as_deref(), Some("composition api"));
        assert_eq!(snap.options[1].id, react);

        store.remove_option(&react).unwrap();
        assert_eq!(store.snapshot().options.len(), 1);
    }

    #[test]
    fn unknown_option_is_rejected() {
        let mut store = test_store();
        assert!(store.remove_option("opt_ghost").is_err());
        assert!(store.add_option("").is_err());
        assert!(store.events().is_empty());
    }
}
