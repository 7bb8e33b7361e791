//! # tg-guard
//!
//! Timesheet reconciliation and budget guard.
//!
//! Given a proposed batch of daily entries for one assignment, the guard
//! diffs them against what is stored, issues the minimal insert/update/delete
//! operations, compares the assignment's budget status before and after, and
//! either keeps the change or aborts it with [`GuardError::OverBudget`].
//!
//! The crate owns no storage. Persistence, status computation and manager
//! notification are reached through the traits in [`ports`]; `tg-db` ships
//! libSQL-backed implementations of all of them.
//!
//! ## Layers
//!
//! - [`engine`]: pure diff of proposed vs. stored entries, then application
//!   against an [`ports::EntryStore`].
//! - [`guard`]: one reconciliation, wrapped in a before/after status check.
//! - [`notify`]: whether a committed reconciliation alerts the project manager.
//! - [`service`]: transaction-scoped reconciliation plus weekly orchestration.

pub mod engine;
pub mod error;
pub mod guard;
pub mod notify;
pub mod ports;
pub mod service;

#[cfg(test)]
mod test_support;

pub use engine::{ChangeSummary, EntryEdit};
pub use error::{AggregatedOverBudgetError, GuardError, OverBudgetError};
pub use guard::{BudgetGuard, Reconciliation};
pub use notify::ManagerAlert;
pub use ports::{AtomicReconciler, CommentStore, EntryStore, NotificationSink, StatusOracle};
pub use service::{AssignmentBatch, TimesheetService, WeekSummary};
