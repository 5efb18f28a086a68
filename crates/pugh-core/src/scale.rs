//! Scoring scales for criteria.
//!
//! A criterion scores on its own scale when it carries one, otherwise on the
//! matrix default (see [`crate::scoring::effective_scale`]).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

const fn default_step() -> f64 {
    1.0
}

/// Display label attached to a score value on a numeric scale.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ScaleLabel {
    pub value: f64,
    pub label: String,
}

/// How a criterion is scored.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scale {
    /// Bounded numeric range with a step and optional per-value labels.
    Numeric {
        min: f64,
        max: f64,
        #[serde(default = "default_step")]
        step: f64,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        labels: Vec<ScaleLabel>,
    },
    /// Yes (1) / No (0).
    Binary,
    /// Any non-negative count.
    Unbounded,
}

impl Default for Scale {
    fn default() -> Self {
        Self::Numeric {
            min: 1.0,
            max: 10.0,
            step: default_step(),
            labels: Vec::new(),
        }
    }
}

impl Scale {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Numeric { .. } => "numeric",
            Self::Binary => "binary",
            Self::Unbounded => "unbounded",
        }
    }

    /// Whether `value` is a legal score on this scale.
    ///
    /// Used by input layers before dispatching a rating; the projector never
    /// consults it.
    #[must_use]
    pub fn accepts(&self, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        match self {
            Self::Numeric { min, max, step, .. } => {
                value >= *min && value <= *max && on_step(value - *min, *step)
            }
            Self::Binary => value == 0.0 || value == 1.0,
            Self::Unbounded => value >= 0.0,
        }
    }

    /// Label for `value`: the label with the greatest value not above it.
    #[must_use]
    pub fn label_for(&self, value: f64) -> Option<&str> {
        let Self::Numeric { labels, .. } = self else {
            return None;
        };
        labels
            .iter()
            .filter(|l| l.value <= value)
            .max_by(|a, b| a.value.total_cmp(&b.value))
            .map(|l| l.label.as_str())
    }
}

/// Whether `offset` is a whole number of `step`s. A non-positive step admits
/// any value in range.
fn on_step(offset: f64, step: f64) -> bool {
    if step <= 0.0 || !step.is_finite() {
        return true;
    }
    let steps = offset / step;
    (steps - steps.round()).abs() < STEP_TOLERANCE
}

const STEP_TOLERANCE: f64 = 1e-9;
