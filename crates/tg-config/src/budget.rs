//! Budget policy configuration.
//!
//! The set of codes that invalidate an assignment status and the threshold
//! for manager alerts are configuration rather than constants:
//!
//! ```toml
//! [budget]
//! notify_threshold = "in_overrun"
//! invalid_codes = ["over_allotted", "over_overrun", "before_start", "after_deadline"]
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tg_core::enums::StatusCode;
use tg_core::status::StatusPolicy;

use crate::error::ConfigError;

fn default_notify_threshold() -> StatusCode {
    StatusPolicy::default().notify_threshold
}

fn default_invalid_codes() -> BTreeSet<StatusCode> {
    StatusPolicy::default().invalid_codes
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BudgetConfig {
    /// Lowest budget code that alerts the project manager when newly reached.
    #[serde(default = "default_notify_threshold")]
    pub notify_threshold: StatusCode,

    /// Codes that make an assignment status invalid.
    #[serde(default = "default_invalid_codes")]
    pub invalid_codes: BTreeSet<StatusCode>,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            notify_threshold: default_notify_threshold(),
            invalid_codes: default_invalid_codes(),
        }
    }
}

impl BudgetConfig {
    /// Check that the section describes a usable policy.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` when the notify threshold is not a
    /// budget code or no code invalidates a status.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.notify_threshold.is_budget_code() {
            return Err(ConfigError::InvalidValue {
                field: "budget.notify_threshold".into(),
                reason: format!("'{}' is not a budget status code", self.notify_threshold),
            });
        }
        if self.invalid_codes.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "budget.invalid_codes".into(),
                reason: "at least one status code must invalidate an assignment".into(),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn policy(&self) -> StatusPolicy {
        StatusPolicy {
            notify_threshold: self.notify_threshold,
            invalid_codes: self.invalid_codes.clone(),
        }
    }
}
