//! Persistence contract consumed by the store, plus two adapters.
//!
//! The store never touches a concrete storage mechanism; it is handed a
//! [`Persister`] at construction and exchanges opaque string blobs with it.

mod file;
pub mod layout;
mod memory;

pub use file::FilePersister;
pub use memory::MemoryPersister;

use crate::error::PersistError;

/// Handle returned by [`Persister::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Called with the key whenever another writer changes it.
pub type ChangeCallback = Box<dyn Fn(&str) + Send + Sync>;

/// Narrow load/save/remove capability over string blobs.
pub trait Persister: Send + Sync {
    /// Read the blob stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] if the backend cannot be read.
    fn load(&self, key: &str) -> Result<Option<String>, PersistError>;

    /// Store `blob` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] if the backend cannot be written.
    fn save(&self, key: &str, blob: &str) -> Result<(), PersistError>;

    /// Delete `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), PersistError>;

    /// Ask to be told when `key` changes from outside this handle.
    ///
    /// Backends without change notification return `None`.
    fn subscribe(&self, _key: &str, _on_change: ChangeCallback) -> Option<SubscriptionId> {
        None
    }

    fn unsubscribe(&self, _id: SubscriptionId) {}
}
