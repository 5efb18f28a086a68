use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::scale::Scale;

/// A row of the matrix: one dimension options are scored against.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Criterion {
    pub id: String,
    pub label: String,
    pub author: String,
    /// Per-criterion override of the matrix default scale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<Scale>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
