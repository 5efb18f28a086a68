//! Branch commands. Unknown ids are reported as `false`, not as errors.

use pugh_core::ids::PREFIX_BRANCH;

use crate::error::StoreError;
use crate::store::{Change, PughStore};

impl PughStore {
    /// Fork the active branch under `name` and switch to the fork.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Rejected`] for a blank name.
    pub fn create_branch(&mut self, name: &str) -> Result<String, StoreError> {
        self.catch_up();
        let id = self.new_id(PREFIX_BRANCH);
        let created_at = self.now();
        self.registry_mut().fork(id.as_str(), name, created_at)?;
        self.commit_branch_change(&Change::BranchCreated {
            branch_id: id.clone(),
        });
        Ok(id)
    }

    /// Activate `id` and project its log. Unknown ids leave everything as is.
    pub fn switch_branch(&mut self, id: &str) -> bool {
        self.catch_up();
        if !self.registry_mut().switch(id) {
            return false;
        }
        self.commit_branch_change(&Change::BranchSwitched {
            branch_id: id.to_string(),
        });
        true
    }

    /// # Errors
    ///
    /// Returns [`StoreError::Rejected`] for a blank name.
    pub fn rename_branch(&mut self, id: &str, name: &str) -> Result<bool, StoreError> {
        self.catch_up();
        if !self.registry_mut().rename(id, name)? {
            return Ok(false);
        }
        self.commit_branch_change(&Change::BranchRenamed {
            branch_id: id.to_string(),
        });
        Ok(true)
    }

    /// Delete `id`. The main branch and unknown ids are refused with `false`.
    pub fn delete_branch(&mut self, id: &str) -> bool {
        self.catch_up();
        if !self.registry_mut().delete(id) {
            return false;
        }
        let active_branch_id = self.active_branch_id().to_string();
        self.commit_branch_change(&Change::BranchDeleted {
            branch_id: id.to_string(),
            active_branch_id,
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use pugh_core::ids::MAIN_BRANCH_ID;

    use super::*;
    use crate::test_support::helpers::test_store;

    #[test]
    fn create_branch_forks_and_activates() {
        let mut store = test_store();
        store.add_option("React").unwrap();
        let id = store.create_branch("experiment").unwrap();

        assert!(id.starts_with("br_"));
        assert_eq!(store.active_branch_id(), id);
        assert_eq!(store.active_branch().fork_event_index, Some(1));
        assert_eq!(store.snapshot().options.len(), 1);
    }

    #[test]
    fn switching_reprojects() {
        let mut store = test_store();
        let id = store.create_branch("experiment").unwrap();
        store.add_option("Angular").unwrap();

        assert!(store.switch_branch(MAIN_BRANCH_ID));
        assert!(store.snapshot().options.is_empty());
        assert!(store.switch_branch(&id));
        assert_eq!(store.snapshot().options.len(), 1);
    }

    #[test]
    fn noops_report_false() {
        let mut store = test_store();
        assert!(!store.switch_branch("br_ghost"));
        assert!(!store.delete_branch(MAIN_BRANCH_ID));
        assert!(!store.delete_branch("br_ghost"));
        assert!(!store.rename_branch("br_ghost", "x").unwrap());
        assert_eq!(store.branches().len(), 1);
    }

    #[test]
    fn blank_branch_name_is_rejected() {
        let mut store = test_store();
        assert!(store.create_branch("").is_err());
        assert!(store.rename_branch(MAIN_BRANCH_ID, " ").is_err());
        assert_eq!(store.branches().len(), 1);
    }

    #[test]
    fn deleting_active_branch_falls_back_to_main() {
        let mut store = test_store();
        store.add_option("React").unwrap();
        let id = store.create_branch("experiment").unwrap();
        store.add_option("Vue").unwrap();
        assert_eq!(store.snapshot().options.len(), 2);

        assert!(store.delete_branch(&id));
        assert_eq!(store.active_branch_id(), MAIN_BRANCH_ID);
        assert_eq!(store.snapshot().options.len(), 1);
    }

    #[test]
    fn rename_branch_keeps_log() {
        let mut store = test_store();
        let id = store.create_branch("tmp").unwrap();
        store.add_option("React").unwrap();
        assert!(store.rename_branch(&id, "pro-react").unwrap());
        assert_eq!(store.active_branch().name, "pro-react");
        assert_eq!(store.events().len(), 1);
    }
}
