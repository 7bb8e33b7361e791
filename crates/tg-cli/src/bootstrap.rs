use std::path::Path;

use anyhow::Context;
use tg_config::TimeguardConfig;

use crate::cli::GlobalFlags;

/// Load `.env`, layered config, and apply command-line overrides.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<TimeguardConfig> {
    load_dotenv()?;

    let mut config = TimeguardConfig::load().context("failed to load timeguard configuration")?;
    apply_overrides(&mut config, flags);
    config.validate()?;

    tracing::debug!(
        database = %config.database.path,
        notify_threshold = %config.budget.notify_threshold,
        "configuration loaded"
    );
    Ok(config)
}

fn load_dotenv() -> anyhow::Result<()> {
    let env_path = Path::new(".env");
    if env_path.exists() {
        dotenvy::from_path(env_path)
            .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
    }
    Ok(())
}

fn apply_overrides(config: &mut TimeguardConfig, flags: &GlobalFlags) {
    if let Some(db) = &flags.db {
        config.database.path.clone_from(db);
    }
}
