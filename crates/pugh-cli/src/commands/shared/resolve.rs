use pugh_store::PughStore;

/// Resolve a branch by id, falling back to a unique name match.
pub fn branch_id(store: &PughStore, key: &str) -> anyhow::Result<String> {
    if store.registry().contains(key) {
        return Ok(key.to_string());
    }
    let matches: Vec<_> = store.branches().iter().filter(|b| b.name == key).collect();
    match matches.as_slice() {
        [branch] => Ok(branch.id.clone()),
        [] => anyhow::bail!("no branch with id or name '{key}'"),
        _ => anyhow::bail!("branch name '{key}' is ambiguous; use the branch id"),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use pugh_core::ids::MAIN_BRANCH_ID;
    use pugh_store::{MemoryPersister, PughStore, StoreOptions};

    use super::branch_id;

    #[test]
    fn resolves_by_id_then_name() {
        let mut store = PughStore::open(Arc::new(MemoryPersister::new()), StoreOptions::default());
        let id = store.create_branch("experiment").expect("branch should create");

        assert_eq!(branch_id(&store, &id).expect("by id"), id);
        assert_eq!(branch_id(&store, "experiment").expect("by name"), id);
        assert_eq!(branch_id(&store, "main").expect("main"), MAIN_BRANCH_ID);
        assert!(branch_id(&store, "nope").is_err());
    }

    #[test]
    fn duplicate_names_are_ambiguous() {
        let mut store = PughStore::open(Arc::new(MemoryPersister::new()), StoreOptions::default());
        store.create_branch("twin").expect("first");
        store.create_branch("twin").expect("second");

        let err = branch_id(&store, "twin").expect_err("should be ambiguous");
        assert!(err.to_string().contains("ambiguous"));
    }
}
