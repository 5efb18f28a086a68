//! # pugh-store
//!
//! Branchable, event-sourced storage for Pugh decision matrices.
//!
//! A [`PughStore`] owns a [`BranchRegistry`] (one append-only event log per
//! branch, one branch active), the projection of the active branch, and a
//! [`Persister`] it saves the whole registry through after every change.
//! Commands on the store are the only way events are appended.
//!
//! ```
//! use std::sync::Arc;
//!
//! use pugh_store::{MemoryPersister, PughStore, RatingDraft, StoreOptions};
//!
//! let mut store = PughStore::open(Arc::new(MemoryPersister::new()), StoreOptions::default());
//! let cost = store.add_criterion("Cost", None).unwrap();
//! let react = store.add_option("React").unwrap();
//! store.rate(&react, &cost, RatingDraft::value(7.0)).unwrap();
//!
//! store.create_branch("what-if").unwrap();
//! store.remove_option(&react).unwrap();
//! assert!(store.snapshot().entries.is_empty());
//! ```

pub mod branch;
pub mod clock;
mod commands;
pub mod error;
pub mod options;
pub mod persist;
pub mod store;
mod test_support;

pub use branch::{Branch, BranchRegistry};
pub use clock::{Clock, ManualClock, SystemClock};
pub use commands::RatingDraft;
pub use error::{PersistError, StoreError};
pub use options::{StoreOptions, WeightPolicy};
pub use persist::{FilePersister, MemoryPersister, Persister, SubscriptionId};
pub use store::{Change, ListenerId, PughStore};
