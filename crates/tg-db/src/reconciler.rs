//! Per-assignment transaction boundary.
//!
//! Each reconciliation runs inside `BEGIN IMMEDIATE`, so the write lock is
//! held from the before-status query until commit and two reconciliations
//! cannot interleave. The entry store and the oracle both read through the
//! transaction, which gives the oracle read-after-write consistency.

use async_trait::async_trait;
use libsql::TransactionBehavior;
use tg_core::entities::{Assignment, Entry};
use tg_core::range::DateRange;
use tg_core::status::StatusPolicy;
use tg_guard::{AtomicReconciler, BudgetGuard, GuardError, Reconciliation};

use crate::TimesheetDb;
use crate::oracle::SqlStatusOracle;
use crate::repos::entry::EntryRepo;

pub struct SqlReconciler<'a> {
    db: &'a TimesheetDb,
    policy: StatusPolicy,
}

impl<'a> SqlReconciler<'a> {
    #[must_use]
    pub const fn new(db: &'a TimesheetDb, policy: StatusPolicy) -> Self {
        Self { db, policy }
    }
}

#[async_trait]
impl AtomicReconciler for SqlReconciler<'_> {
    async fn reconcile_atomically(
        &self,
        assignment: &Assignment,
        proposed: &[Entry],
        range: &DateRange,
    ) -> Result<Reconciliation, GuardError> {
        let tx = self
            .db
            .conn()
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .await
            .map_err(|e| GuardError::Transaction(e.into()))?;

        let outcome = {
            let entries = EntryRepo::new(&tx);
            let oracle = SqlStatusOracle::new(&tx, self.policy.clone());
            BudgetGuard::new(&entries, &oracle, self.policy.notify_threshold)
                .reconcile(assignment, proposed, range)
                .await
        };

        match outcome {
            Ok(reconciliation) => {
                tx.commit()
                    .await
                    .map_err(|e| GuardError::Transaction(e.into()))?;
                Ok(reconciliation)
            }
            Err(e) => {
                if let Err(rollback) = tx.rollback().await {
                    tracing::error!(
                        assignment_id = assignment.id,
                        error = %rollback,
                        "rollback failed"
                    );
                }
                Err(e)
            }
        }
    }
}
