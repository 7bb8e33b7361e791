//! Budget status oracle over stored entries.
//!
//! Budget codes follow the eHour rules:
//!
//! | booked hours                         | fixed           | flex            |
//! |--------------------------------------|-----------------|-----------------|
//! | `<= allotted`                        | `in_allotted`   | `in_allotted`   |
//! | `> allotted`, `<= allotted + overrun`| `over_allotted` | `in_overrun`    |
//! | `> allotted + overrun`               | `over_allotted` | `over_overrun`  |
//!
//! A booking dated before the assignment's start adds `before_start`, one
//! after its end adds `after_deadline`. Validity is decided by the configured
//! [`StatusPolicy`].

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::NaiveDate;
use tg_core::entities::Assignment;
use tg_core::enums::{BudgetKind, StatusCode};
use tg_core::status::{AssignmentAggregate, AssignmentStatus, StatusPolicy};
use tg_guard::StatusOracle;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_optional_date};

/// Totals over the booked entries of one assignment.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BookingTotals {
    pub booked_hours: f64,
    pub first_booked: Option<NaiveDate>,
    pub last_booked: Option<NaiveDate>,
}

/// Status codes for `assignment` given its booking totals.
#[must_use]
pub fn evaluate(assignment: &Assignment, totals: &BookingTotals) -> BTreeSet<StatusCode> {
    let mut codes = BTreeSet::new();

    let booked = totals.booked_hours;
    let budget_code = if booked <= assignment.allotted_hours {
        StatusCode::InAllotted
    } else {
        match assignment.kind {
            BudgetKind::Fixed => StatusCode::OverAllotted,
            BudgetKind::Flex if booked <= assignment.ceiling_hours() => StatusCode::InOverrun,
            BudgetKind::Flex => StatusCode::OverOverrun,
        }
    };
    codes.insert(budget_code);

    if let (Some(start), Some(first)) = (assignment.date_start, totals.first_booked) {
        if first < start {
            codes.insert(StatusCode::BeforeStart);
        }
    }
    if let (Some(end), Some(last)) = (assignment.date_end, totals.last_booked) {
        if last > end {
            codes.insert(StatusCode::AfterDeadline);
        }
    }

    codes
}

/// Status oracle reading through a borrowed connection or transaction.
pub struct SqlStatusOracle<'a> {
    conn: &'a libsql::Connection,
    policy: StatusPolicy,
}

impl<'a> SqlStatusOracle<'a> {
    #[must_use]
    pub const fn new(conn: &'a libsql::Connection, policy: StatusPolicy) -> Self {
        Self { conn, policy }
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the aggregate query fails.
    pub async fn totals(&self, assignment_id: i64) -> Result<BookingTotals, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                "SELECT COALESCE(SUM(hours), 0.0), MIN(entry_date), MAX(entry_date)
                 FROM timesheet_entries WHERE assignment_id = ?1 AND hours > 0",
                [assignment_id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(BookingTotals {
            booked_hours: row.get(0)?,
            first_booked: parse_optional_date(get_opt_string(&row, 1)?.as_deref())?,
            last_booked: parse_optional_date(get_opt_string(&row, 2)?.as_deref())?,
        })
    }
}

#[async_trait]
impl StatusOracle for SqlStatusOracle<'_> {
    async fn status_of(&self, assignment: &Assignment) -> anyhow::Result<AssignmentStatus> {
        let totals = self.totals(assignment.id).await?;
        let aggregate = AssignmentAggregate {
            assignment_id: assignment.id,
            booked_hours: totals.booked_hours,
            allotted_hours: assignment.allotted_hours,
            allowed_overrun_hours: assignment.allowed_overrun_hours,
        };
        let status = self
            .policy
            .snapshot(evaluate(assignment, &totals), Some(aggregate));
        tracing::trace!(
            assignment_id = assignment.id,
            booked = totals.booked_hours,
            codes = ?status.codes,
            valid = status.valid,
            "evaluated assignment status"
        );
        Ok(status)
    }
}
