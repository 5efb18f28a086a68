//! Registry persistence: round-trips through both shipped persisters,
//! soft-fail loading, and cross-instance sync.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use pugh_core::ids::MAIN_BRANCH_ID;
use pugh_store::persist::layout::PERSIST_VERSION;
use pugh_store::{
    Change, FilePersister, MemoryPersister, Persister, PughStore, RatingDraft, StoreOptions,
};
use tempfile::TempDir;

fn populate(store: &mut PughStore) {
    let cost = store.add_criterion("Cost", None).unwrap();
    let react = store.add_option("React").unwrap();
    store.rate(&react, &cost, RatingDraft::value(6.0)).unwrap();
    store.set_weight(&cost, 7).unwrap();
    store.create_branch("alt").unwrap();
    store.add_option("Vue").unwrap();
}

#[test]
fn file_round_trip_restores_registry_and_snapshot() {
    let tmp = TempDir::new().unwrap();
    let persister = Arc::new(FilePersister::new(tmp.path().join(".pugh")));

    let mut store = PughStore::open(persister.clone(), StoreOptions::default());
    populate(&mut store);
    let registry = store.registry().clone();
    let snapshot = store.snapshot().clone();
    drop(store);

    let reopened = PughStore::open(persister, StoreOptions::default());
    assert_eq!(reopened.registry(), &registry);
    assert_eq!(reopened.snapshot(), &snapshot);
    assert_eq!(reopened.snapshot().options.len(), 2);
}

#[test]
fn persisted_blob_carries_version_and_active_branch() {
    let persister = Arc::new(MemoryPersister::new());
    let mut store = PughStore::open(persister.clone(), StoreOptions::default());
    populate(&mut store);

    let blob = persister.load("pugh-matrix").unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&blob).unwrap();
    assert_eq!(value["version"], PERSIST_VERSION);
    assert_eq!(value["activeBranchId"], store.active_branch_id());
    assert_eq!(value["branches"].as_array().unwrap().len(), 2);
}

#[test]
fn custom_key_is_respected() {
    let persister = Arc::new(MemoryPersister::new());
    let mut store = PughStore::open(
        persister.clone(),
        StoreOptions::default().with_persist_key("team"),
    );
    store.add_option("React").unwrap();
    assert!(persister.load("team").unwrap().is_some());
    assert!(persister.load("pugh-matrix").unwrap().is_none());
}

#[test]
fn corrupt_file_soft_fails_to_fresh_main() {
    let tmp = TempDir::new().unwrap();
    let persister = Arc::new(FilePersister::new(tmp.path()));
    persister.save("pugh-matrix", "][").unwrap();

    let store = PughStore::open(persister, StoreOptions::default());
    assert_eq!(store.branches().len(), 1);
    assert_eq!(store.active_branch_id(), MAIN_BRANCH_ID);
    assert!(store.events().is_empty());
}

/// A main-only registry blob holding `events`.
fn main_blob(events: serde_json::Value) -> String {
    serde_json::json!({
        "version": 1,
        "activeBranchId": MAIN_BRANCH_ID,
        "branches": [{
            "id": MAIN_BRANCH_ID,
            "name": "main",
            "createdAt": "2026-02-08T12:00:00Z",
            "events": events
        }]
    })
    .to_string()
}

#[test]
fn unknown_event_kinds_survive_a_save() {
    let persister = Arc::new(MemoryPersister::new());
    let option_added = serde_json::json!({
        "id": "evt_1", "timestamp": "2026-02-08T12:00:01Z", "author": "ana",
        "branchId": MAIN_BRANCH_ID, "type": "OptionAdded", "optionId": "opt_a", "label": "A",
        "correlationId": "req-42", "color": "#61dafb"
    });
    let exported = serde_json::json!({
        "id": "evt_2", "timestamp": "2026-02-08T12:00:02Z", "author": "ana",
        "branchId": MAIN_BRANCH_ID, "type": "MatrixExported", "format": "csv"
    });
    let blob = main_blob(serde_json::json!([option_added.clone(), exported.clone()]));
    persister.save("pugh-matrix", &blob).unwrap();

    let mut store = PughStore::open(persister.clone(), StoreOptions::default());
    assert_eq!(store.snapshot().options.len(), 1);
    store.add_option("B").unwrap();

    let saved: serde_json::Value =
        serde_json::from_str(&persister.load("pugh-matrix").unwrap().unwrap()).unwrap();
    let events = saved["branches"][0]["events"].as_array().unwrap();
    assert_eq!(events.len(), 3);
    assert_eq!(events[0], option_added);
    assert_eq!(events[1], exported);
}

#[test]
fn external_write_is_picked_up_by_sync() {
    let shared = MemoryPersister::new();
    let mut first = PughStore::open(Arc::new(shared.connect()), StoreOptions::default());
    let mut second = PughStore::open(Arc::new(shared.connect()), StoreOptions::default());

    let reloads = Rc::new(Cell::new(0));
    let counter = Rc::clone(&reloads);
    second.subscribe(move |change, _| {
        if *change == Change::Reloaded {
            counter.set(counter.get() + 1);
        }
    });

    first.add_option("React").unwrap();
    assert!(second.has_external_change());
    assert!(second.snapshot().options.is_empty());

    assert!(second.sync_external());
    assert_eq!(second.snapshot().options.len(), 1);
    assert_eq!(reloads.get(), 1);

    // Nothing new since the last sync.
    assert!(!second.sync_external());

    // Own writes are not reported back.
    second.add_option("Vue").unwrap();
    assert!(!second.has_external_change());
    assert!(first.has_external_change());
    assert!(first.sync_external());
    assert_eq!(first.snapshot().options.len(), 2);
}

#[test]
fn commands_catch_up_on_external_writes_first() {
    let shared = MemoryPersister::new();
    let mut first = PughStore::open(Arc::new(shared.connect()), StoreOptions::default());
    let mut second = PughStore::open(Arc::new(shared.connect()), StoreOptions::default());

    first.add_option("React").unwrap();
    // second has not synced; its next command must not drop React.
    second.add_option("Vue").unwrap();

    let labels: Vec<_> = second.snapshot().options.iter().map(|o| o.label.as_str()).collect();
    assert_eq!(labels, ["React", "Vue"]);

    let saved: serde_json::Value =
        serde_json::from_str(&shared.load("pugh-matrix").unwrap().unwrap()).unwrap();
    assert_eq!(saved["branches"][0]["events"].as_array().unwrap().len(), 2);

    assert!(first.sync_external());
    assert_eq!(first.snapshot().options.len(), 2);
}

#[test]
fn branch_commands_catch_up_on_external_writes_first() {
    let shared = MemoryPersister::new();
    let mut first = PughStore::open(Arc::new(shared.connect()), StoreOptions::default());
    let mut second = PughStore::open(Arc::new(shared.connect()), StoreOptions::default());

    first.create_branch("alt").unwrap();
    second.create_branch("other").unwrap();

    let names: Vec<_> = second.branches().iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, ["main", "alt", "other"]);
    assert!(first.sync_external());
    assert_eq!(first.branches().len(), 3);
}

#[test]
fn external_write_replaces_state_wholesale() {
    let shared = MemoryPersister::new();
    let mut store = PughStore::open(Arc::new(shared.connect()), StoreOptions::default());
    store.create_branch("local-only").unwrap();

    let option_added = serde_json::json!({
        "id": "evt_1", "timestamp": "2026-02-08T12:00:01Z", "author": "bo",
        "branchId": MAIN_BRANCH_ID, "type": "OptionAdded", "optionId": "opt_a", "label": "A"
    });
    shared
        .connect()
        .save("pugh-matrix", &main_blob(serde_json::json!([option_added])))
        .unwrap();

    // Registry granularity: the local branch is gone.
    assert!(store.sync_external());
    assert_eq!(store.branches().len(), 1);
    assert_eq!(store.active_branch_id(), MAIN_BRANCH_ID);
    assert_eq!(store.snapshot().options.len(), 1);
}

#[test]
fn reload_after_external_remove_starts_fresh() {
    let shared = MemoryPersister::new();
    let mut store = PughStore::open(Arc::new(shared.connect()), StoreOptions::default());
    store.add_option("React").unwrap();

    shared.remove("pugh-matrix").unwrap();
    store.reload();
    assert!(store.events().is_empty());
    assert!(!store.has_external_change());
}
