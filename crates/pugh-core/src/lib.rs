//! # pugh-core
//!
//! Core types for Pugh decision matrices.
//!
//! This crate provides the pieces every other Pugh crate builds on:
//! - Entity structs for criteria, options, and cell entries (ratings/comments)
//! - The `Scale` type and matrix-level configuration
//! - ID prefix constants and the pluggable `IdGenerator`
//! - The closed event schema (`Event`, `EventKind`) with validating constructors
//! - The projector that folds an ordered event log into a `MatrixSnapshot`
//! - Read helpers for current ratings, comment threads, and weighted totals
//! - Seeding of an initial event log from plain entity lists

pub mod entities;
pub mod errors;
pub mod events;
pub mod ids;
pub mod projection;
pub mod scale;
pub mod scoring;
pub mod seed;

pub use errors::CoreError;
pub use events::{Event, EventClass, EventKind, EventPayload};
pub use projection::{MatrixSnapshot, project};
