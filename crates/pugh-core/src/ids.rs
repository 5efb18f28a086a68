//! ID prefixes and identifier generation.
//!
//! Every identifier is `{prefix}_{token}`. The token comes from an
//! [`IdGenerator`]; the rest of the system only relies on tokens being unique
//! and stable, never on their encoding.

use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

pub const PREFIX_EVENT: &str = "evt";
pub const PREFIX_BRANCH: &str = "br";
pub const PREFIX_RATING: &str = "rating";
pub const PREFIX_COMMENT: &str = "comment";
pub const PREFIX_OPTION: &str = "opt";
pub const PREFIX_CRITERION: &str = "cri";

/// Well-known id of the branch that always exists and cannot be deleted.
pub const MAIN_BRANCH_ID: &str = "br_00000000-0000-0000-0000-000000000000";

/// Display name given to the main branch in a fresh registry.
pub const MAIN_BRANCH_NAME: &str = "main";

/// Source of unique, lexically sortable tokens.
pub trait IdGenerator: Send + Sync {
    /// Produce the next unique token.
    fn token(&self) -> String;

    /// Produce `{prefix}_{token}`.
    fn prefixed(&self, prefix: &str) -> String {
        format!("{prefix}_{}", self.token())
    }
}

/// Time-ordered UUID v7 tokens. The default generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidV7Ids;

impl IdGenerator for UuidV7Ids {
    fn token(&self) -> String {
        Uuid::now_v7().to_string()
    }
}

/// Zero-padded counter tokens (`00000000000000000001`, ...).
///
/// Deterministic, so tests and seeded fixtures produce stable ids.
#[derive(Debug)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl SequentialIds {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Start counting from `start`.
    #[must_use]
    pub const fn starting_at(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn token(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{n:020}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_tokens_are_unique() {
        let ids = UuidV7Ids;
        let a = ids.prefixed(PREFIX_EVENT);
        let b = ids.prefixed(PREFIX_EVENT);
        assert_ne!(a, b);
        assert!(a.starts_with("evt_"));
    }

    #[test]
    fn sequential_tokens_sort_lexically() {
        let ids = SequentialIds::starting_at(9);
        let a = ids.token();
        let b = ids.token();
        assert_eq!(a, "00000000000000000009");
        assert_eq!(b, "00000000000000000010");
        assert!(a < b);
    }

    #[test]
    fn main_branch_id_is_prefixed() {
        assert!(MAIN_BRANCH_ID.starts_with(PREFIX_BRANCH));
    }
}
