use std::path::Path;

use anyhow::Context;
use pugh_config::PughConfig;

/// Load `.env` from the project root, then layered configuration.
pub fn load_config(project_root: &Path) -> anyhow::Result<PughConfig> {
    let env_path = project_root.join(".env");
    if env_path.exists() {
        dotenvy::from_path(&env_path)
            .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
    }

    let config = PughConfig::load_for(project_root).context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;
    Ok(config)
}
