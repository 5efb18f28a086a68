//! Branches and the registry that tracks which one is active.
//!
//! A branch owns its event log outright. Forking clones the parent's log, so
//! nothing appended afterwards to either side can reach the other.

use chrono::{DateTime, Utc};
use pugh_core::CoreError;
use pugh_core::Event;
use pugh_core::ids::{MAIN_BRANCH_ID, MAIN_BRANCH_NAME};
use serde::{Deserialize, Serialize};

/// A named, independent event log with optional fork lineage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: String,
    pub name: String,
    events: Vec<Event>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_branch_id: Option<String>,
    /// Length of the parent's log at fork time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fork_event_index: Option<usize>,
}

impl Branch {
    fn main(created_at: DateTime<Utc>) -> Self {
        Self {
            id: MAIN_BRANCH_ID.to_string(),
            name: MAIN_BRANCH_NAME.to_string(),
            events: Vec::new(),
            created_at,
            parent_branch_id: None,
            fork_event_index: None,
        }
    }

    /// The branch log in append order.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    #[must_use]
    pub fn is_main(&self) -> bool {
        self.id == MAIN_BRANCH_ID
    }
}

/// All branches in creation order, with exactly one active.
#[derive(Debug, Clone, PartialEq)]
pub struct BranchRegistry {
    branches: Vec<Branch>,
    active: String,
}

impl BranchRegistry {
    /// A registry holding only an empty main branch.
    #[must_use]
    pub fn new(created_at: DateTime<Utc>) -> Self {
        Self {
            branches: vec![Branch::main(created_at)],
            active: MAIN_BRANCH_ID.to_string(),
        }
    }

    /// Rebuild a registry from persisted parts.
    ///
    /// An `active_branch_id` that names no branch falls back to main.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] if the main branch is missing or two
    /// branches share an id.
    pub fn restore(branches: Vec<Branch>, active_branch_id: String) -> Result<Self, CoreError> {
        if !branches.iter().any(Branch::is_main) {
            return Err(CoreError::Validation("main branch is missing".into()));
        }
        for (i, branch) in branches.iter().enumerate() {
            CoreError::require_id("branch_id", &branch.id)?;
            if branches[..i].iter().any(|b| b.id == branch.id) {
                return Err(CoreError::Validation(format!(
                    "duplicate branch id {}",
                    branch.id
                )));
            }
        }

        let active = if branches.iter().any(|b| b.id == active_branch_id) {
            active_branch_id
        } else {
            tracing::warn!(
                %active_branch_id,
                "persisted active branch does not exist, falling back to main"
            );
            MAIN_BRANCH_ID.to_string()
        };
        Ok(Self { branches, active })
    }

    /// Decompose into `(branches, active_branch_id)`.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Branch>, String) {
        (self.branches, self.active)
    }

    #[must_use]
    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Branch> {
        self.branches.iter().find(|b| b.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    #[must_use]
    pub fn active_branch_id(&self) -> &str {
        &self.active
    }

    /// The active branch.
    #[must_use]
    pub fn active(&self) -> &Branch {
        self.branches
            .iter()
            .find(|b| b.id == self.active)
            // The active id always names a branch, and main is never removed.
            .unwrap_or(&self.branches[0])
    }

    /// Append to the active branch. Only the dispatcher calls this.
    pub(crate) fn append(&mut self, event: Event) {
        let active = self.active.clone();
        if let Some(branch) = self.branches.iter_mut().find(|b| b.id == active) {
            branch.events.push(event);
        }
    }

    /// Fork the active branch into a new branch `id` and make it active.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] for a blank name or an id already in
    /// use, and [`CoreError::MissingId`] for an empty id.
    pub fn fork(
        &mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<&Branch, CoreError> {
        let id = id.into();
        let name = name.into();
        CoreError::require_id("branch_id", &id)?;
        if name.trim().is_empty() {
            return Err(CoreError::Validation("branch name must not be empty".into()));
        }
        if self.contains(&id) {
            return Err(CoreError::Validation(format!("branch {id} already exists")));
        }

        let parent = self.active();
        let branch = Branch {
            id: id.clone(),
            name,
            events: parent.events.clone(),
            created_at,
            parent_branch_id: Some(parent.id.clone()),
            fork_event_index: Some(parent.events.len()),
        };
        tracing::info!(
            branch_id = %branch.id,
            parent = %self.active,
            fork_event_index = branch.events.len(),
            "forked branch"
        );
        self.branches.push(branch);
        self.active = id;
        Ok(self.active())
    }

    /// Make `id` active. Returns `false`, changing nothing, if it is unknown.
    pub fn switch(&mut self, id: &str) -> bool {
        if !self.contains(id) {
            tracing::debug!(branch_id = id, "switch to unknown branch ignored");
            return false;
        }
        self.active = id.to_string();
        true
    }

    /// Rename `id` in place. Returns `false` if it is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] for a blank name.
    pub fn rename(&mut self, id: &str, name: impl Into<String>) -> Result<bool, CoreError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CoreError::Validation("branch name must not be empty".into()));
        }
        let Some(branch) = self.branches.iter_mut().find(|b| b.id == id) else {
            tracing::debug!(branch_id = id, "rename of unknown branch ignored");
            return Ok(false);
        };
        branch.name = name;
        Ok(true)
    }

    /// Remove `id`. Main and unknown ids are refused with `false`.
    ///
    /// Deleting the active branch activates the first remaining branch.
    pub fn delete(&mut self, id: &str) -> bool {
        if id == MAIN_BRANCH_ID {
            tracing::debug!("refusing to delete the main branch");
            return false;
        }
        let Some(index) = self.branches.iter().position(|b| b.id == id) else {
            tracing::debug!(branch_id = id, "delete of unknown branch ignored");
            return false;
        };
        self.branches.remove(index);
        if self.active == id {
            // Main is never removed, so at least one branch remains.
            self.active.clone_from(&self.branches[0].id);
        }
        tracing::info!(branch_id = id, active = %self.active, "deleted branch");
        true
    }
}
