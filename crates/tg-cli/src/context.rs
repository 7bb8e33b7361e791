use anyhow::Context;
use tg_config::TimeguardConfig;
use tg_core::status::StatusPolicy;
use tg_db::TimesheetDb;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub db: TimesheetDb,
    pub config: TimeguardConfig,
}

impl AppContext {
    pub async fn init(config: TimeguardConfig) -> anyhow::Result<Self> {
        let db = TimesheetDb::open(&config.database)
            .await
            .with_context(|| format!("failed to open database at {}", config.database.path))?;
        Ok(Self { db, config })
    }

    /// Budget policy from the `[budget]` config section.
    pub fn policy(&self) -> StatusPolicy {
        self.config.budget.policy()
    }
}
