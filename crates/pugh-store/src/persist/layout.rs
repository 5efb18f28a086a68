//! The persisted registry layout and its versioning.
//!
//! ```json
//! {"version": 1, "branches": [...], "activeBranchId": "br_..."}
//! ```

use pugh_core::CoreError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::branch::{Branch, BranchRegistry};

/// Layout version written by this build. Other versions load as absent.
pub const PERSIST_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersistedRegistry {
    pub version: u32,
    pub branches: Vec<Branch>,
    pub active_branch_id: String,
}

/// Why a stored blob could not be restored.
#[derive(Debug, Error)]
pub enum DecodeFailure {
    /// Not valid JSON for this layout.
    #[error("malformed registry blob: {0}")]
    Malformed(#[source] serde_json::Error),

    /// Well-formed, but written with a layout version this build cannot read.
    #[error("unsupported registry version {0}")]
    UnknownVersion(u32),

    /// Parsed, but the branches break a registry invariant.
    #[error("invalid registry: {0}")]
    Invalid(#[source] CoreError),
}

/// Encode `registry` at the current layout version.
///
/// # Errors
///
/// Returns the serializer error; in practice only non-string map keys fail.
pub fn encode(registry: &BranchRegistry) -> Result<String, serde_json::Error> {
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Borrowed<'a> {
        version: u32,
        branches: &'a [Branch],
        active_branch_id: &'a str,
    }

    serde_json::to_string(&Borrowed {
        version: PERSIST_VERSION,
        branches: registry.branches(),
        active_branch_id: registry.active_branch_id(),
    })
}

/// Decode a stored blob back into a registry.
///
/// The version is checked before the branches are read, so a newer layout
/// reports [`DecodeFailure::UnknownVersion`] rather than a parse error.
///
/// # Errors
///
/// Returns a [`DecodeFailure`] describing why the blob cannot be used.
pub fn decode(blob: &str) -> Result<BranchRegistry, DecodeFailure> {
    #[derive(Deserialize)]
    struct VersionHeader {
        version: u32,
    }

    let header: VersionHeader = serde_json::from_str(blob).map_err(DecodeFailure::Malformed)?;
    if header.version != PERSIST_VERSION {
        return Err(DecodeFailure::UnknownVersion(header.version));
    }
    let persisted: PersistedRegistry =
        serde_json::from_str(blob).map_err(DecodeFailure::Malformed)?;
    BranchRegistry::restore(persisted.branches, persisted.active_branch_id)
        .map_err(DecodeFailure::Invalid)
}
