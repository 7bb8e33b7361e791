//! Assignment status snapshots and the policy that interprets them.
//!
//! A status snapshot is produced on demand by a status oracle and never
//! persisted. Reconciliation takes one before and one after its mutations and
//! compares them.

use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::StatusCode;

/// Totals behind a status snapshot, used in manager alerts.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct AssignmentAggregate {
    pub assignment_id: i64,
    pub booked_hours: f64,
    pub allotted_hours: f64,
    pub allowed_overrun_hours: f64,
}

impl AssignmentAggregate {
    /// Allotted hours left to book. Negative once the assignment is over its allotment.
    #[must_use]
    pub fn remaining_hours(&self) -> f64 {
        self.allotted_hours - self.booked_hours
    }
}

/// A point-in-time status of one assignment.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct AssignmentStatus {
    pub codes: BTreeSet<StatusCode>,
    pub valid: bool,
    pub aggregate: Option<AssignmentAggregate>,
}

impl Default for AssignmentStatus {
    fn default() -> Self {
        Self {
            codes: BTreeSet::new(),
            valid: true,
            aggregate: None,
        }
    }
}

impl AssignmentStatus {
    #[must_use]
    pub fn with_code(mut self, code: StatusCode) -> Self {
        self.codes.insert(code);
        self
    }

    #[must_use]
    pub fn with_valid(mut self, valid: bool) -> Self {
        self.valid = valid;
        self
    }

    #[must_use]
    pub fn with_aggregate(mut self, aggregate: AssignmentAggregate) -> Self {
        self.aggregate = Some(aggregate);
        self
    }

    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    #[must_use]
    pub const fn is_invalid(&self) -> bool {
        !self.valid
    }

    #[must_use]
    pub fn contains(&self, code: StatusCode) -> bool {
        self.codes.contains(&code)
    }

    /// The most severe code in `self` at or above `threshold` that `before`
    /// did not contain.
    #[must_use]
    pub fn newly_reached(&self, before: &Self, threshold: StatusCode) -> Option<StatusCode> {
        self.codes
            .iter()
            .copied()
            .filter(|code| code.is_at_or_above(threshold) && !before.contains(*code))
            .max_by_key(|code| code.severity())
    }
}

/// Which status codes matter to the guard and the notification decision.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StatusPolicy {
    /// Lowest budget code that triggers a manager alert when newly reached.
    pub notify_threshold: StatusCode,
    /// Codes that make a snapshot invalid.
    pub invalid_codes: BTreeSet<StatusCode>,
}

impl Default for StatusPolicy {
    fn default() -> Self {
        Self {
            notify_threshold: StatusCode::InOverrun,
            invalid_codes: [
                StatusCode::OverAllotted,
                StatusCode::OverOverrun,
                StatusCode::BeforeStart,
                StatusCode::AfterDeadline,
            ]
            .into_iter()
            .collect(),
        }
    }
}

impl StatusPolicy {
    /// Build a snapshot from raw codes, deriving validity from this policy.
    #[must_use]
    pub fn snapshot(
        &self,
        codes: BTreeSet<StatusCode>,
        aggregate: Option<AssignmentAggregate>,
    ) -> AssignmentStatus {
        let valid = codes.is_disjoint(&self.invalid_codes);
        AssignmentStatus {
            codes,
            valid,
            aggregate,
        }
    }
}
