//! Collaborator traits consumed by the guard.
//!
//! Implementations return `anyhow::Result`; the guard wraps failures into the
//! matching [`GuardError`] variant and never retries them.

use async_trait::async_trait;
use tg_core::entities::{Assignment, Comment, Entry};
use tg_core::range::DateRange;
use tg_core::status::AssignmentStatus;

use crate::error::GuardError;
use crate::guard::Reconciliation;
use crate::notify::ManagerAlert;

/// Persisted timesheet entries of assignments.
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Stored entries of `assignment_id` dated within `range`, ordered by date.
    async fn entries_in_range(
        &self,
        assignment_id: i64,
        range: &DateRange,
    ) -> anyhow::Result<Vec<Entry>>;

    async fn insert(&self, entry: &Entry) -> anyhow::Result<()>;

    /// Replace hours and comment of the stored entry with the same identity.
    async fn update(&self, entry: &Entry) -> anyhow::Result<()>;

    async fn delete(&self, entry: &Entry) -> anyhow::Result<()>;

    /// The most recently dated entry of the assignment that books hours.
    async fn latest_entry(&self, assignment_id: i64) -> anyhow::Result<Option<Entry>>;
}

/// Computes the current budget status of an assignment.
///
/// Must observe writes made through the [`EntryStore`] it is paired with,
/// including uncommitted writes inside the same transaction.
#[async_trait]
pub trait StatusOracle: Send + Sync {
    async fn status_of(&self, assignment: &Assignment) -> anyhow::Result<AssignmentStatus>;
}

/// One-way channel to project managers.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify_manager_budget_reached(&self, alert: &ManagerAlert) -> anyhow::Result<()>;
}

/// Persists the free-text comment of a weekly batch.
#[async_trait]
pub trait CommentStore: Send + Sync {
    async fn persist_comment(&self, comment: &Comment) -> anyhow::Result<()>;
}

/// Runs one reconciliation inside its own storage transaction.
///
/// On `Ok` the transaction has committed. On any `Err` nothing the
/// reconciliation wrote is visible afterwards.
#[async_trait]
pub trait AtomicReconciler: Send + Sync {
    async fn reconcile_atomically(
        &self,
        assignment: &Assignment,
        proposed: &[Entry],
        range: &DateRange,
    ) -> Result<Reconciliation, GuardError>;
}
