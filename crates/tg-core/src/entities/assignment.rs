use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::BudgetKind;

/// The person alerted when an assignment crosses its budget threshold.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Manager {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub manager: Option<Manager>,
}

/// A worker's budgeted engagement on a project.
///
/// Created and edited outside the reconciliation core, which only reads it.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Assignment {
    pub id: i64,
    pub user_id: String,
    pub project: Project,
    pub kind: BudgetKind,
    /// Hours the assignment may book before it leaves `in_allotted`.
    pub allotted_hours: f64,
    /// Extra hours a flex assignment may book after the allotted hours are used.
    /// Ignored for fixed assignments.
    #[serde(default)]
    pub allowed_overrun_hours: f64,
    /// Whether the project manager is alerted on threshold crossings.
    pub notify_pm: bool,
    pub date_start: Option<NaiveDate>,
    pub date_end: Option<NaiveDate>,
}

impl Assignment {
    /// Total hours that can be booked before the assignment is over budget.
    #[must_use]
    pub fn ceiling_hours(&self) -> f64 {
        match self.kind {
            BudgetKind::Fixed => self.allotted_hours,
            BudgetKind::Flex => self.allotted_hours + self.allowed_overrun_hours,
        }
    }

    /// The manager of the assignment's project, if one is set.
    #[must_use]
    pub const fn manager(&self) -> Option<&Manager> {
        self.project.manager.as_ref()
    }
}
