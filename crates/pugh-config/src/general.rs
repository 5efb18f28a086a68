//! General application configuration.

use serde::{Deserialize, Serialize};

fn default_author() -> String {
    "anonymous".to_string()
}

/// Lowest weight a command may set.
const fn default_weight_min() -> i64 {
    0
}

/// Highest weight a command may set.
const fn default_weight_max() -> i64 {
    10
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Author stamped on every event this process records.
    #[serde(default = "default_author")]
    pub author: String,

    #[serde(default = "default_weight_min")]
    pub weight_min: i64,

    #[serde(default = "default_weight_max")]
    pub weight_max: i64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            author: default_author(),
            weight_min: default_weight_min(),
            weight_max: default_weight_max(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = GeneralConfig::default();
        assert_eq!(config.author, "anonymous");
        assert_eq!(config.weight_min, 0);
        assert_eq!(config.weight_max, 10);
    }
}
