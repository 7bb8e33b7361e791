//! Guard error types.
//!
//! Business failures (`OverBudget`, `AggregatedOverBudget`, `InvalidEntry`)
//! are told apart from fatal ones by variant, never by message text.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;
use tg_core::errors::CoreError;
use tg_core::range::DateRange;
use tg_core::status::AssignmentStatus;

/// A reconciliation that would grow an assignment past its budget.
#[derive(Debug, Clone, Error, Serialize)]
#[error("assignment {assignment_id} would be over budget for {range}")]
pub struct OverBudgetError {
    pub assignment_id: i64,
    pub range: DateRange,
    /// Status the assignment would have had if the change were kept.
    pub status: AssignmentStatus,
}

/// One or more assignments of a weekly batch were rejected as over budget.
#[derive(Debug, Clone, Error, Serialize)]
#[error("{} assignment(s) rejected as over budget: {:?}", .failures.len(), rejected_ids(.failures))]
pub struct AggregatedOverBudgetError {
    /// Rejected assignments, keyed by assignment id.
    pub failures: BTreeMap<i64, OverBudgetError>,
    /// Assignments of the same batch whose changes were committed.
    pub committed: Vec<i64>,
}

fn rejected_ids(failures: &BTreeMap<i64, OverBudgetError>) -> Vec<i64> {
    failures.keys().copied().collect()
}

#[derive(Debug, Error)]
pub enum GuardError {
    #[error(transparent)]
    OverBudget(#[from] OverBudgetError),

    #[error(transparent)]
    AggregatedOverBudget(#[from] AggregatedOverBudgetError),

    /// A proposed entry failed validation before any collaborator was called.
    #[error("Invalid entry: {0}")]
    InvalidEntry(CoreError),

    #[error("Entry store failed: {0:#}")]
    Store(anyhow::Error),

    #[error("Status oracle failed: {0:#}")]
    Oracle(anyhow::Error),

    #[error("Comment store failed: {0:#}")]
    Comments(anyhow::Error),

    /// Beginning, committing or rolling back the storage transaction failed.
    #[error("Transaction failed: {0:#}")]
    Transaction(anyhow::Error),
}

impl GuardError {
    /// Whether this is a budget rejection rather than an I/O or input failure.
    #[must_use]
    pub const fn is_over_budget(&self) -> bool {
        matches!(self, Self::OverBudget(_) | Self::AggregatedOverBudget(_))
    }
}
