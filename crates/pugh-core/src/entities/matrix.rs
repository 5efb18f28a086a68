use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::scale::Scale;

/// Matrix-wide scoring configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MatrixConfig {
    /// Scale used by criteria that do not override it.
    pub default_scale: Scale,
    /// Whether scores below zero are meaningful for this matrix.
    pub allow_negative: bool,
}

/// Descriptive matrix metadata plus its scoring configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MatrixMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub archived: bool,
    pub config: MatrixConfig,
}
