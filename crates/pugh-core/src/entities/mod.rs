//! Entity structs for the materialized matrix state.
//!
//! These are projection outputs, never the source of truth: every value here
//! is derived from an event log by [`crate::projection::project`]. All structs
//! derive `Serialize`, `Deserialize`, and `JsonSchema` for JSON output and
//! schema validation.

mod criterion;
mod entry;
mod matrix;
mod option;

pub use criterion::Criterion;
pub use entry::{CellEntry, EntryBody};
pub use matrix::{MatrixConfig, MatrixMeta};
pub use option::DecisionOption;
