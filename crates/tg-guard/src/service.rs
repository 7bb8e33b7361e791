//! Transaction-scoped reconciliation and weekly batch orchestration.
//!
//! [`TimesheetService`] is the entry point callers use. It never opens a
//! transaction itself: every reconciliation goes through the injected
//! [`AtomicReconciler`], and alerts are delivered only after it returns `Ok`,
//! i.e. after the transaction has committed.

use std::collections::BTreeMap;

use serde::Serialize;
use tg_core::entities::{Assignment, Comment, Entry};
use tg_core::range::DateRange;

use crate::error::{AggregatedOverBudgetError, GuardError};
use crate::guard::Reconciliation;
use crate::notify::deliver;
use crate::ports::{AtomicReconciler, CommentStore, NotificationSink};

/// Proposed entries of one assignment within a weekly batch.
#[derive(Debug, Clone)]
pub struct AssignmentBatch {
    pub assignment: Assignment,
    pub entries: Vec<Entry>,
}

/// Outcome of a weekly batch in which every assignment committed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WeekSummary {
    pub reconciled: Vec<Reconciliation>,
}

impl WeekSummary {
    /// Number of alerts handed to the notification sink.
    #[must_use]
    pub fn alerts_sent(&self) -> usize {
        self.reconciled.iter().filter(|r| r.alert.is_some()).count()
    }
}

pub struct TimesheetService<R, C, N> {
    reconciler: R,
    comments: C,
    sink: N,
}

impl<R, C, N> TimesheetService<R, C, N>
where
    R: AtomicReconciler,
    C: CommentStore,
    N: NotificationSink,
{
    #[must_use]
    pub const fn new(reconciler: R, comments: C, sink: N) -> Self {
        Self {
            reconciler,
            comments,
            sink,
        }
    }

    /// Reconcile one assignment in its own transaction, then deliver any alert.
    ///
    /// # Errors
    ///
    /// Propagates the reconciler's `GuardError` unchanged.
    pub async fn reconcile(
        &self,
        assignment: &Assignment,
        proposed: &[Entry],
        range: &DateRange,
    ) -> Result<Reconciliation, GuardError> {
        let outcome = self
            .reconciler
            .reconcile_atomically(assignment, proposed, range)
            .await?;
        if let Some(alert) = &outcome.alert {
            deliver(&self.sink, alert).await;
        }
        Ok(outcome)
    }

    /// Reconcile every assignment of a weekly batch, then persist the comment.
    ///
    /// Every proposed entry is validated before the first transaction opens,
    /// so a malformed sheet writes nothing. Each distinct assignment then runs
    /// in its own transaction, in first-seen order. Over-budget rejections do
    /// not stop the batch; they are collected and reported together once every
    /// assignment has been attempted and the comment is stored. A `None`
    /// comment leaves any stored comment for the week untouched.
    ///
    /// # Errors
    ///
    /// - `GuardError::InvalidEntry` if any proposed entry is malformed; no
    ///   assignment is reconciled and the comment is not written.
    /// - `GuardError::AggregatedOverBudget` if any assignment was rejected.
    /// - Any fatal error stops the batch immediately. Assignments committed
    ///   before it stay committed and the comment is not written.
    pub async fn persist_week(
        &self,
        batches: &[AssignmentBatch],
        comment: Option<&Comment>,
        range: &DateRange,
    ) -> Result<WeekSummary, GuardError> {
        let batches = merge_batches(batches);
        validate_batches(&batches)?;

        let mut summary = WeekSummary::default();
        let mut failures = BTreeMap::new();

        for batch in batches {
            match self.reconcile(&batch.assignment, &batch.entries, range).await {
                Ok(outcome) => summary.reconciled.push(outcome),
                Err(GuardError::OverBudget(e)) => {
                    failures.insert(batch.assignment.id, e);
                }
                Err(e) => {
                    tracing::error!(
                        assignment_id = batch.assignment.id,
                        error = %e,
                        "weekly batch aborted"
                    );
                    return Err(e);
                }
            }
        }

        if let Some(comment) = comment {
            self.comments
                .persist_comment(comment)
                .await
                .map_err(GuardError::Comments)?;
        }

        tracing::info!(
            %range,
            comment = comment.is_some(),
            committed = summary.reconciled.len(),
            rejected = failures.len(),
            "persisted weekly batch"
        );

        if failures.is_empty() {
            Ok(summary)
        } else {
            Err(AggregatedOverBudgetError {
                failures,
                committed: summary.reconciled.iter().map(|r| r.assignment_id).collect(),
            }
            .into())
        }
    }
}

/// Reject the whole batch if any proposed entry is malformed.
fn validate_batches(batches: &[AssignmentBatch]) -> Result<(), GuardError> {
    for batch in batches {
        for entry in &batch.entries {
            if let Err(e) = entry.validate() {
                tracing::warn!(
                    assignment_id = batch.assignment.id,
                    date = %entry.date,
                    error = %e,
                    "weekly batch rejected before any write"
                );
                return Err(GuardError::InvalidEntry(e));
            }
        }
    }
    Ok(())
}

/// Collapse batches that name the same assignment, keeping first-seen order.
fn merge_batches(batches: &[AssignmentBatch]) -> Vec<AssignmentBatch> {
    let mut merged: Vec<AssignmentBatch> = Vec::with_capacity(batches.len());
    for batch in batches {
        match merged
            .iter_mut()
            .find(|m| m.assignment.id == batch.assignment.id)
        {
            Some(existing) => existing.entries.extend(batch.entries.iter().cloned()),
            None => merged.push(batch.clone()),
        }
    }
    merged
}
