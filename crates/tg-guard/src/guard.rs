//! The budget guard: one reconciliation wrapped in a before/after status check.

use serde::Serialize;
use tg_core::entities::{Assignment, Entry};
use tg_core::enums::StatusCode;
use tg_core::range::DateRange;
use tg_core::status::AssignmentStatus;

use crate::engine::{ChangeSummary, apply_edits, plan_edits};
use crate::error::{GuardError, OverBudgetError};
use crate::notify::{ManagerAlert, reached_code};
use crate::ports::{EntryStore, StatusOracle};

/// Result of a committed reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reconciliation {
    pub assignment_id: i64,
    pub changes: ChangeSummary,
    pub before: AssignmentStatus,
    pub after: AssignmentStatus,
    /// Alert to deliver once the surrounding transaction has committed.
    pub alert: Option<ManagerAlert>,
}

/// Runs reconciliations against collaborators bound to one transaction.
///
/// The guard never commits or rolls back itself. Callers drop the
/// transaction's writes when [`BudgetGuard::reconcile`] returns `Err`.
pub struct BudgetGuard<'a> {
    entries: &'a dyn EntryStore,
    oracle: &'a dyn StatusOracle,
    notify_threshold: StatusCode,
}

impl<'a> BudgetGuard<'a> {
    #[must_use]
    pub const fn new(
        entries: &'a dyn EntryStore,
        oracle: &'a dyn StatusOracle,
        notify_threshold: StatusCode,
    ) -> Self {
        Self {
            entries,
            oracle,
            notify_threshold,
        }
    }

    /// Reconcile `proposed` against the stored entries of `assignment` in `range`.
    ///
    /// Queries the oracle exactly twice, before and after the mutations. The
    /// change is rejected iff it grew any date's hours and the after-status is
    /// invalid; pure decreases always pass, even on an invalid assignment.
    ///
    /// # Errors
    ///
    /// - `GuardError::InvalidEntry` if a proposed entry has negative or
    ///   non-finite hours; no collaborator is called.
    /// - `GuardError::OverBudget` if the change must be rolled back.
    /// - `GuardError::Store` / `GuardError::Oracle` on collaborator failure.
    pub async fn reconcile(
        &self,
        assignment: &Assignment,
        proposed: &[Entry],
        range: &DateRange,
    ) -> Result<Reconciliation, GuardError> {
        for entry in proposed {
            entry.validate().map_err(GuardError::InvalidEntry)?;
        }

        let before = self
            .oracle
            .status_of(assignment)
            .await
            .map_err(GuardError::Oracle)?;

        let stored = self
            .entries
            .entries_in_range(assignment.id, range)
            .await
            .map_err(GuardError::Store)?;
        let edits = plan_edits(assignment.id, range, proposed, &stored);
        let changes = apply_edits(self.entries, &edits)
            .await
            .map_err(GuardError::Store)?;

        let after = self
            .oracle
            .status_of(assignment)
            .await
            .map_err(GuardError::Oracle)?;

        if changes.any_increase && after.is_invalid() {
            tracing::warn!(
                assignment_id = assignment.id,
                %range,
                codes = ?after.codes,
                "rejecting reconciliation: assignment would be over budget"
            );
            return Err(OverBudgetError {
                assignment_id: assignment.id,
                range: *range,
                status: after,
            }
            .into());
        }

        let alert = match reached_code(assignment, &before, &after, self.notify_threshold) {
            Some(reached) => {
                let booked_until = self
                    .entries
                    .latest_entry(assignment.id)
                    .await
                    .map_err(GuardError::Store)?
                    .map(|entry| entry.date);
                ManagerAlert::new(assignment, reached, &after, booked_until)
            }
            None => None,
        };

        tracing::debug!(
            assignment_id = assignment.id,
            %range,
            inserted = changes.inserted,
            updated = changes.updated,
            deleted = changes.deleted,
            alert = alert.is_some(),
            "reconciled assignment"
        );

        Ok(Reconciliation {
            assignment_id: assignment.id,
            changes,
            before,
            after,
            alert,
        })
    }
}
