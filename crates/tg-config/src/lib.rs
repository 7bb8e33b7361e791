//! # tg-config
//!
//! Layered configuration loading for Timeguard using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`TIMEGUARD_*` prefix, `__` as separator)
//! 2. Project-level `.timeguard/config.toml`
//! 3. User-level `~/.config/timeguard/config.toml`
//! 4. Built-in defaults
//!
//! Figment maps `TIMEGUARD_DATABASE__PATH` -> `database.path`,
//! `TIMEGUARD_BUDGET__NOTIFY_THRESHOLD` -> `budget.notify_threshold`, etc.
//!
//! ```no_run
//! use tg_config::TimeguardConfig;
//!
//! let config = TimeguardConfig::load().expect("config");
//! println!("database: {}", config.database.path);
//! ```

mod budget;
mod database;
mod error;

pub use budget::BudgetConfig;
pub use database::DatabaseConfig;
pub use error::ConfigError;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TimeguardConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub budget: BudgetConfig,
}

impl TimeguardConfig {
    /// Load configuration from all sources (TOML files + environment variables)
    /// and validate it.
    ///
    /// Does NOT read `.env`; the CLI loads it before calling this.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a section is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }


    /// Extract and validate a config from an arbitrary figment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a section is invalid.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".timeguard/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("TIMEGUARD_").split("__"))
    }

    /// Validate every section.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError::InvalidValue` found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.path.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "database.path".into(),
                reason: "must not be empty".into(),
            });
        }
        self.budget.validate()
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("timeguard").join("config.toml"))
    }
}
