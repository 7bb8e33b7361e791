//! Manager notification decision and delivery.

use chrono::NaiveDate;
use serde::Serialize;
use tg_core::entities::{Assignment, Manager};
use tg_core::enums::{AlertKind, StatusCode};
use tg_core::status::{AssignmentAggregate, AssignmentStatus};

use crate::ports::NotificationSink;

/// Payload sent to a project manager when an assignment crosses its threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManagerAlert {
    pub assignment_id: i64,
    pub project_id: i64,
    pub user_id: String,
    pub manager: Manager,
    pub kind: AlertKind,
    /// The newly reached status code that triggered the alert.
    pub reached: StatusCode,
    pub aggregate: Option<AssignmentAggregate>,
    /// Date of the most recently booked entry of the assignment.
    pub booked_until: Option<NaiveDate>,
}

/// The code that makes a committed reconciliation alert-worthy, if any.
///
/// Requires the assignment's notify flag, a project manager, and a code at or
/// above `threshold` in `after` that `before` did not contain.
#[must_use]
pub fn reached_code(
    assignment: &Assignment,
    before: &AssignmentStatus,
    after: &AssignmentStatus,
    threshold: StatusCode,
) -> Option<StatusCode> {
    if !assignment.notify_pm || assignment.manager().is_none() {
        return None;
    }
    after.newly_reached(before, threshold)
}

impl ManagerAlert {
    /// Build the alert for `assignment`. `None` when the project has no manager.
    #[must_use]
    pub fn new(
        assignment: &Assignment,
        reached: StatusCode,
        after: &AssignmentStatus,
        booked_until: Option<NaiveDate>,
    ) -> Option<Self> {
        let manager = assignment.manager()?.clone();
        Some(Self {
            assignment_id: assignment.id,
            project_id: assignment.project.id,
            user_id: assignment.user_id.clone(),
            manager,
            kind: AlertKind::for_transition(assignment.kind, reached),
            reached,
            aggregate: after.aggregate.clone(),
            booked_until,
        })
    }
}

/// Hand `alert` to `sink`. Failures are logged and swallowed.
pub async fn deliver(sink: &dyn NotificationSink, alert: &ManagerAlert) {
    match sink.notify_manager_budget_reached(alert).await {
        Ok(()) => tracing::info!(
            assignment_id = alert.assignment_id,
            manager = %alert.manager.email,
            kind = %alert.kind,
            "notified project manager"
        ),
        Err(e) => tracing::warn!(
            assignment_id = alert.assignment_id,
            manager = %alert.manager.email,
            error = %format!("{e:#}"),
            "manager notification failed"
        ),
    }
}
