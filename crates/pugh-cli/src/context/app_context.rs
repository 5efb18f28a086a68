use std::path::Path;
use std::sync::Arc;

use pugh_config::PughConfig;
use pugh_store::{FilePersister, PughStore, StoreOptions};

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub store: PughStore,
}

impl AppContext {
    /// Open the store persisted under the project's data directory.
    ///
    /// Missing or unreadable state is not an error: the store starts from an
    /// empty main branch and the first mutation creates the directory.
    #[must_use]
    pub fn init(project_root: &Path, config: &PughConfig) -> Self {
        let data_dir = config.store.data_path(project_root);
        let persister = Arc::new(FilePersister::new(data_dir.clone()));
        let store = PughStore::open(persister, StoreOptions::from_config(config));

        tracing::debug!(
            project_root = %project_root.display(),
            data_dir = %data_dir.display(),
            branch = store.active_branch_id(),
            "application context ready"
        );

        Self { store }
    }

    /// Fail when the last mutation could not be written to disk; this process
    /// exits right after, so an unsaved change is a lost change.
    pub fn ensure_saved(&self) -> anyhow::Result<()> {
        match self.store.last_persist_error() {
            Some(err) => anyhow::bail!("change was not saved: {err}"),
            None => Ok(()),
        }
    }
}
