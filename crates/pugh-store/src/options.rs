//! Construction options for [`crate::PughStore`].

use std::sync::Arc;

use pugh_config::PughConfig;
use pugh_core::CoreError;
use pugh_core::ids::{IdGenerator, UuidV7Ids};
use pugh_core::seed::SeedData;

use crate::clock::{Clock, SystemClock};

pub const DEFAULT_PERSIST_KEY: &str = "pugh-matrix";
pub const DEFAULT_AUTHOR: &str = "anonymous";

/// Inclusive bounds a weight command must respect.
///
/// The projector accepts any weight; this policy is applied before an event
/// is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightPolicy {
    pub min: i64,
    pub max: i64,
}

impl Default for WeightPolicy {
    fn default() -> Self {
        Self { min: 0, max: 10 }
    }
}

impl WeightPolicy {
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] if `weight` is outside the bounds.
    pub fn check(&self, weight: i64) -> Result<(), CoreError> {
        if weight < self.min || weight > self.max {
            return Err(CoreError::Validation(format!(
                "weight {weight} is outside {}..={}",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct StoreOptions {
    pub persist_key: String,
    pub author: String,
    pub weights: WeightPolicy,
    pub clock: Arc<dyn Clock>,
    pub ids: Arc<dyn IdGenerator>,
    /// Initial data for a store that finds nothing usable in persistence.
    pub seed: Option<SeedData>,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            persist_key: DEFAULT_PERSIST_KEY.to_string(),
            author: DEFAULT_AUTHOR.to_string(),
            weights: WeightPolicy::default(),
            clock: Arc::new(SystemClock),
            ids: Arc::new(UuidV7Ids),
            seed: None,
        }
    }
}

impl std::fmt::Debug for StoreOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreOptions")
            .field("persist_key", &self.persist_key)
            .field("author", &self.author)
            .field("weights", &self.weights)
            .field("seed", &self.seed.is_some())
            .finish_non_exhaustive()
    }
}

impl StoreOptions {
    /// Options taken from loaded configuration, with the system clock and
    /// UUID v7 ids.
    #[must_use]
    pub fn from_config(config: &PughConfig) -> Self {
        Self {
            persist_key: config.store.persist_key.clone(),
            author: config.general.author.clone(),
            weights: WeightPolicy {
                min: config.general.weight_min,
                max: config.general.weight_max,
            },
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    #[must_use]
    pub fn with_persist_key(mut self, key: impl Into<String>) -> Self {
        self.persist_key = key.into();
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_ids(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: SeedData) -> Self {
        self.seed = Some(seed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_bounds_are_inclusive() {
        let policy = WeightPolicy::default();
        assert!(policy.check(0).is_ok());
        assert!(policy.check(10).is_ok());
        assert!(policy.check(-1).is_err());
        assert!(policy.check(11).is_err());
    }

    #[test]
    fn from_config_maps_fields() {
        let mut config = PughConfig::default();
        config.general.author = "ana".into();
        config.general.weight_max = 5;
        config.store.persist_key = "k".into();
        let options = StoreOptions::from_config(&config);
        assert_eq!(options.author, "ana");
        assert_eq!(options.persist_key, "k");
        assert_eq!(options.weights, WeightPolicy { min: 0, max: 5 });
    }
}
