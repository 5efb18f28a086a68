//! The store: branch registry, current snapshot, persistence and observers
//! composed into one object.
//!
//! Every mutation follows the same sequence before returning:
//! 1. Build and stamp the event (id, timestamp, author, branch)
//! 2. Append it to the active branch
//! 3. Re-project the active branch from its full log
//! 4. Save the registry (failures are logged and kept, never rolled back)
//! 5. Notify observers
//!
//! A pending change from another writer is applied before any command reads
//! state, so commands never overwrite events they have not seen.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use pugh_core::ids::PREFIX_EVENT;
use pugh_core::{Event, EventKind, MatrixSnapshot, project};

use crate::branch::{Branch, BranchRegistry};
use crate::error::StoreError;
use crate::options::StoreOptions;
use crate::persist::{Persister, SubscriptionId, layout};

/// What an observer is told after a successful mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    EventAppended { branch_id: String, event_id: String },
    BranchCreated { branch_id: String },
    BranchSwitched { branch_id: String },
    BranchRenamed { branch_id: String },
    BranchDeleted { branch_id: String, active_branch_id: String },
    /// State was replaced wholesale from persistence.
    Reloaded,
}

/// Handle returned by [`PughStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&Change, &PughStore)>;

pub struct PughStore {
    registry: BranchRegistry,
    snapshot: MatrixSnapshot,
    persister: Arc<dyn Persister>,
    options: StoreOptions,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
    subscription: Option<SubscriptionId>,
    external_change: Arc<AtomicBool>,
    /// Last blob this instance read from or wrote to persistence.
    last_blob: Option<String>,
    /// Why the latest save did not happen; cleared by the next good save.
    persist_error: Option<StoreError>,
}

impl std::fmt::Debug for PughStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PughStore")
            .field("active_branch_id", &self.registry.active_branch_id())
            .field("branches", &self.registry.branches().len())
            .field("listeners", &self.listeners.len())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl PughStore {
    /// Open a store over `persister`.
    ///
    /// Never fails: an absent, unreadable, malformed or unknown-version blob
    /// yields a fresh main branch (seeded from `options.seed` when given).
    pub fn open(persister: Arc<dyn Persister>, options: StoreOptions) -> Self {
        let external_change = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&external_change);
        let subscription = persister.subscribe(
            &options.persist_key,
            Box::new(move |_key| flag.store(true, Ordering::SeqCst)),
        );

        let blob = load_blob(persister.as_ref(), &options.persist_key);
        let registry = registry_from(blob.as_deref(), &options);
        let snapshot = project(registry.active().events());
        tracing::debug!(
            branches = registry.branches().len(),
            active = registry.active_branch_id(),
            events = registry.active().events().len(),
            "store opened"
        );

        Self {
            registry,
            snapshot,
            persister,
            options,
            listeners: Vec::new(),
            next_listener: 0,
            subscription,
            external_change,
            last_blob: blob,
            persist_error: None,
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Projection of the active branch.
    #[must_use]
    pub const fn snapshot(&self) -> &MatrixSnapshot {
        &self.snapshot
    }

    #[must_use]
    pub const fn registry(&self) -> &BranchRegistry {
        &self.registry
    }

    #[must_use]
    pub fn branches(&self) -> &[Branch] {
        self.registry.branches()
    }

    #[must_use]
    pub fn active_branch(&self) -> &Branch {
        self.registry.active()
    }

    #[must_use]
    pub fn active_branch_id(&self) -> &str {
        self.registry.active_branch_id()
    }

    /// The active branch log.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        self.registry.active().events()
    }

    /// Project any branch without switching to it.
    #[must_use]
    pub fn branch_snapshot(&self, branch_id: &str) -> Option<MatrixSnapshot> {
        self.registry.get(branch_id).map(|b| project(b.events()))
    }

    #[must_use]
    pub const fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Whether another writer changed the persisted registry since the last
    /// [`Self::sync_external`].
    #[must_use]
    pub fn has_external_change(&self) -> bool {
        self.external_change.load(Ordering::SeqCst)
    }

    /// The failure of the most recent save, if it failed. The mutation that
    /// triggered it is still applied in memory.
    #[must_use]
    pub const fn last_persist_error(&self) -> Option<&StoreError> {
        self.persist_error.as_ref()
    }

    // -----------------------------------------------------------------------
    // Observers
    // -----------------------------------------------------------------------

    /// Register `listener`, called synchronously after every mutation.
    pub fn subscribe(&mut self, listener: impl FnMut(&Change, &Self) + 'static) -> ListenerId {
        self.next_listener += 1;
        let id = ListenerId(self.next_listener);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns `false` if `id` was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(l, _)| *l != id);
        self.listeners.len() != before
    }

    fn notify(&mut self, change: &Change) {
        let mut listeners = std::mem::take(&mut self.listeners);
        for (_, listener) in &mut listeners {
            listener(change, &*self);
        }
        self.listeners = listeners;
    }

    // -----------------------------------------------------------------------
    // Cross-instance sync
    // -----------------------------------------------------------------------

    /// Apply a change another writer made to the persisted registry.
    ///
    /// Does nothing unless the persister reported a change. When the stored
    /// blob differs from the last one this instance saw, in-memory state is
    /// replaced wholesale. Returns whether state was replaced.
    pub fn sync_external(&mut self) -> bool {
        if !self.external_change.swap(false, Ordering::SeqCst) {
            return false;
        }
        let blob = load_blob(self.persister.as_ref(), &self.options.persist_key);
        if blob == self.last_blob {
            tracing::debug!("external change matches local state, nothing to reload");
            return false;
        }
        self.replace_from(blob);
        true
    }

    /// Sync before a command reads or changes state.
    pub(crate) fn catch_up(&mut self) {
        if self.has_external_change() && self.sync_external() {
            tracing::debug!("applied external change before command");
        }
    }

    /// Replace in-memory state with whatever is persisted now.
    pub fn reload(&mut self) {
        self.external_change.store(false, Ordering::SeqCst);
        let blob = load_blob(self.persister.as_ref(), &self.options.persist_key);
        self.replace_from(blob);
    }

    fn replace_from(&mut self, blob: Option<String>) {
        self.registry = registry_from(blob.as_deref(), &self.options);
        self.last_blob = blob;
        self.reproject();
        tracing::info!(
            active = self.registry.active_branch_id(),
            branches = self.registry.branches().len(),
            "reloaded registry from persistence"
        );
        self.notify(&Change::Reloaded);
    }

    // -----------------------------------------------------------------------
    // Dispatch plumbing shared by the command modules
    // -----------------------------------------------------------------------

    /// Stamp `kind`, append it to the active branch, then reproject, persist
    /// and notify.
    pub(crate) fn dispatch(&mut self, kind: EventKind) -> Result<Event, StoreError> {
        self.catch_up();
        let event = Event::new(
            self.options.ids.prefixed(PREFIX_EVENT),
            self.options.clock.now(),
            self.options.author.clone(),
            self.registry.active_branch_id(),
            kind,
        )?;
        tracing::debug!(
            event_id = %event.id,
            event_type = event.type_name(),
            branch_id = %event.branch_id,
            "dispatching event"
        );
        self.registry.append(event.clone());
        self.reproject();
        self.persist();
        self.notify(&Change::EventAppended {
            branch_id: event.branch_id.clone(),
            event_id: event.id.clone(),
        });
        Ok(event)
    }

    /// Finish a registry-level change (fork, switch, rename, delete).
    pub(crate) fn commit_branch_change(&mut self, change: &Change) {
        self.reproject();
        self.persist();
        self.notify(change);
    }

    pub(crate) const fn registry_mut(&mut self) -> &mut BranchRegistry {
        &mut self.registry
    }

    pub(crate) fn new_id(&self, prefix: &str) -> String {
        self.options.ids.prefixed(prefix)
    }

    pub(crate) fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.options.clock.now()
    }

    fn reproject(&mut self) {
        self.snapshot = project(self.registry.active().events());
    }

    /// Save the registry. In-memory state is already final; a failed save is
    /// logged, kept for [`Self::last_persist_error`], and the store carries on.
    fn persist(&mut self) {
        self.persist_error = self.save_registry().err();
    }

    fn save_registry(&mut self) -> Result<(), StoreError> {
        let blob = layout::encode(&self.registry).inspect_err(|e| {
            tracing::warn!(error = %e, "failed to encode registry, not saved");
        })?;
        self.persister
            .save(&self.options.persist_key, &blob)
            .inspect_err(|e| {
                tracing::warn!(
                    error = %e,
                    key = %self.options.persist_key,
                    "failed to save registry"
                );
            })?;
        self.last_blob = Some(blob);
        Ok(())
    }
}

impl Drop for PughStore {
    fn drop(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.persister.unsubscribe(id);
        }
    }
}

fn load_blob(persister: &dyn Persister, key: &str) -> Option<String> {
    match persister.load(key) {
        Ok(blob) => blob,
        Err(e) => {
            tracing::warn!(error = %e, key, "failed to read persisted registry, starting fresh");
            None
        }
    }
}

/// Decode `blob`, or build a fresh (optionally seeded) registry.
fn registry_from(blob: Option<&str>, options: &StoreOptions) -> BranchRegistry {
    if let Some(blob) = blob {
        match layout::decode(blob) {
            Ok(registry) => return registry,
            Err(e) => tracing::warn!(error = %e, "ignoring persisted registry, starting fresh"),
        }
    }
    fresh_registry(options)
}

fn fresh_registry(options: &StoreOptions) -> BranchRegistry {
    let mut registry = BranchRegistry::new(options.clock.now());
    let Some(seed) = &options.seed else {
        return registry;
    };
    let seeded = match seed.seed_events() {
        Ok(seeded) => seeded,
        Err(e) => {
            tracing::warn!(error = %e, "seed data rejected, starting empty");
            return registry;
        }
    };
    let branch_id = registry.active_branch_id().to_string();
    for item in seeded {
        let stamped = Event::new(
            options.ids.prefixed(PREFIX_EVENT),
            item.timestamp.unwrap_or_else(|| options.clock.now()),
            item.author.unwrap_or_else(|| options.author.clone()),
            branch_id.as_str(),
            item.kind,
        );
        match stamped {
            Ok(event) => registry.append(event),
            Err(e) => tracing::warn!(error = %e, "skipping seed event"),
        }
    }
    tracing::info!(
        events = registry.active().events().len(),
        "seeded fresh registry"
    );
    registry
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use pretty_assertions::assert_eq;
    use pugh_core::ids::MAIN_BRANCH_ID;

    use super::*;
    use crate::error::PersistError;
    use crate::persist::MemoryPersister;
    use crate::test_support::helpers::{test_options, test_store};

    struct FailingPersister;

    impl Persister for FailingPersister {
        fn load(&self, _key: &str) -> Result<Option<String>, PersistError> {
            Err(PersistError::Backend("offline".into()))
        }
        fn save(&self, _key: &str, _blob: &str) -> Result<(), PersistError> {
            Err(PersistError::Backend("offline".into()))
        }
        fn remove(&self, _key: &str) -> Result<(), PersistError> {
            Err(PersistError::Backend("offline".into()))
        }
    }

    #[test]
    fn opens_fresh_main_when_nothing_persisted() {
        let store = test_store();
        assert_eq!(store.branches().len(), 1);
        assert_eq!(store.active_branch_id(), MAIN_BRANCH_ID);
        assert!(store.events().is_empty());
        assert_eq!(store.snapshot(), &MatrixSnapshot::default());
    }

    #[test]
    fn malformed_blob_falls_back_to_fresh_main() {
        let persister = Arc::new(MemoryPersister::new());
        persister.save("pugh-matrix", "{\"version\":1,").unwrap();
        let store = PughStore::open(persister, test_options());
        assert_eq!(store.branches().len(), 1);
        assert!(store.events().is_empty());
    }

    #[test]
    fn unknown_version_falls_back_to_fresh_main() {
        let persister = Arc::new(MemoryPersister::new());
        persister
            .save(
                "pugh-matrix",
                r#"{"version":99,"branches":[],"activeBranchId":"x"}"#,
            )
            .unwrap();
        let store = PughStore::open(persister, test_options());
        assert_eq!(store.active_branch_id(), MAIN_BRANCH_ID);
    }

    #[test]
    fn failing_backend_never_blocks_commands() {
        let mut store = PughStore::open(Arc::new(FailingPersister), test_options());
        let id = store.add_criterion("Cost", None).unwrap();
        assert_eq!(store.snapshot().criteria[0].id, id);
        assert_eq!(store.events().len(), 1);

        let err = store.last_persist_error().expect("save should have failed");
        assert!(matches!(err, StoreError::Persistence(PersistError::Backend(_))));
        assert!(err.to_string().contains("offline"));
    }

    /// Saves fail while `offline` is set.
    struct FlakyPersister {
        inner: MemoryPersister,
        offline: std::sync::atomic::AtomicBool,
    }

    impl Persister for FlakyPersister {
        fn load(&self, key: &str) -> Result<Option<String>, PersistError> {
            self.inner.load(key)
        }
        fn save(&self, key: &str, blob: &str) -> Result<(), PersistError> {
            if self.offline.load(Ordering::SeqCst) {
                return Err(PersistError::Backend("disk full".into()));
            }
            self.inner.save(key, blob)
        }
        fn remove(&self, key: &str) -> Result<(), PersistError> {
            self.inner.remove(key)
        }
    }

    #[test]
    fn next_good_save_clears_persist_error() {
        let persister = Arc::new(FlakyPersister {
            inner: MemoryPersister::new(),
            offline: AtomicBool::new(true),
        });
        let mut store = PughStore::open(persister.clone(), test_options());

        store.add_option("React").unwrap();
        assert!(store.last_persist_error().is_some());
        assert!(persister.inner.load("pugh-matrix").unwrap().is_none());

        persister.offline.store(false, Ordering::SeqCst);
        store.create_branch("alt").unwrap();
        assert!(store.last_persist_error().is_none());
        assert!(persister.inner.load("pugh-matrix").unwrap().is_some());
    }

    #[test]
    fn events_are_stamped_from_options() {
        let mut store = test_store();
        store.add_option("React").unwrap();
        let event = &store.events()[0];
        assert_eq!(event.id, "evt_00000000000000000002");
        assert_eq!(event.author, "tester");
        assert_eq!(event.branch_id, MAIN_BRANCH_ID);
    }

    #[test]
    fn observers_see_each_change_and_can_unsubscribe() {
        let mut store = test_store();
        let seen: Rc<RefCell<Vec<(Change, usize)>>> = Rc::default();
        let sink = Rc::clone(&seen);
        let id = store.subscribe(move |change, store| {
            sink.borrow_mut()
                .push((change.clone(), store.snapshot().options.len()));
        });

        store.add_option("React").unwrap();
        let branch = store.create_branch("alt").unwrap();
        assert!(store.unsubscribe(id));
        store.add_option("Vue").unwrap();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert!(matches!(seen[0].0, Change::EventAppended { .. }));
        // The observer reads the state after the mutation.
        assert_eq!(seen[0].1, 1);
        assert_eq!(seen[1].0, Change::BranchCreated { branch_id: branch });
        assert!(!store.unsubscribe(id));
    }

    #[test]
    fn seed_applies_to_fresh_store_only() {
        let seed: pugh_core::seed::SeedData = serde_json::from_value(serde_json::json!({
            "criteria": [{"id": "cri_cost", "label": "Cost"}],
            "options": [{"id": "opt_a", "label": "A"}],
            "ratings": [{"id": "r1", "optionId": "opt_a", "criterionId": "cri_cost", "value": 3}]
        }))
        .unwrap();

        let persister = Arc::new(MemoryPersister::new());
        let mut store = PughStore::open(persister.clone(), test_options().with_seed(seed.clone()));
        assert_eq!(store.snapshot().rating_count(), 1);
        assert_eq!(store.events()[0].author, "tester");
        store.add_option("B").unwrap();
        drop(store);

        let reopened = PughStore::open(persister, test_options().with_seed(seed));
        assert_eq!(reopened.snapshot().options.len(), 2);
        assert_eq!(reopened.events().len(), 4);
    }
}
