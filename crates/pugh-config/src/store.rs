//! Where and under which key the branch registry is stored.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

fn default_data_dir() -> String {
    ".pugh".to_string()
}

fn default_persist_key() -> String {
    "pugh-matrix".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Directory for persisted state, relative to the project root unless
    /// absolute.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Key the registry blob is saved under.
    #[serde(default = "default_persist_key")]
    pub persist_key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            persist_key: default_persist_key(),
        }
    }
}

impl StoreConfig {
    /// Resolve `data_dir` against `project_root`.
    #[must_use]
    pub fn data_path(&self, project_root: &Path) -> PathBuf {
        let dir = Path::new(&self.data_dir);
        if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            project_root.join(dir)
        }
    }
}
