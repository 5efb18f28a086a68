use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{ChangeCallback, Persister, SubscriptionId};
use crate::error::PersistError;

static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);

struct Subscription {
    id: SubscriptionId,
    key: String,
    handle: u64,
    callback: Arc<dyn Fn(&str) + Send + Sync>,
}

#[derive(Default)]
struct Shared {
    blobs: HashMap<String, String>,
    subscriptions: Vec<Subscription>,
    next_subscription: u64,
}

/// In-memory blob store.
///
/// Handles created with [`MemoryPersister::connect`] share one map, like
/// several processes sharing a storage area. A write through one handle
/// notifies subscribers registered through the *other* handles.
pub struct MemoryPersister {
    shared: Arc<Mutex<Shared>>,
    handle: u64,
}

impl Default for MemoryPersister {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryPersister {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryPersister")
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}

impl MemoryPersister {
    #[must_use]
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared::default())),
            handle: NEXT_HANDLE.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Another handle onto the same storage.
    #[must_use]
    pub fn connect(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            handle: NEXT_HANDLE.fetch_add(1, Ordering::Relaxed),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify_others(&self, key: &str) {
        let callbacks: Vec<_> = self
            .lock()
            .subscriptions
            .iter()
            .filter(|s| s.key == key && s.handle != self.handle)
            .map(|s| Arc::clone(&s.callback))
            .collect();
        // Called without the lock held so a callback may use the persister.
        for callback in callbacks {
            callback(key);
        }
    }
}

impl Persister for MemoryPersister {
    fn load(&self, key: &str) -> Result<Option<String>, PersistError> {
        Ok(self.lock().blobs.get(key).cloned())
    }

    fn save(&self, key: &str, blob: &str) -> Result<(), PersistError> {
        self.lock().blobs.insert(key.to_string(), blob.to_string());
        self.notify_others(key);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistError> {
        let removed = self.lock().blobs.remove(key).is_some();
        if removed {
            self.notify_others(key);
        }
        Ok(())
    }

    fn subscribe(&self, key: &str, on_change: ChangeCallback) -> Option<SubscriptionId> {
        let mut shared = self.lock();
        shared.next_subscription += 1;
        let id = SubscriptionId(shared.next_subscription);
        shared.subscriptions.push(Subscription {
            id,
            key: key.to_string(),
            handle: self.handle,
            callback: Arc::from(on_change),
        });
        Some(id)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.lock().subscriptions.retain(|s| s.id != id);
    }
}
