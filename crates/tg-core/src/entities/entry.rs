use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// A single day's booked hours against an assignment.
///
/// Identity is `(assignment_id, date)`. `hours` of `None` or zero means
/// "no booking": proposing such an entry for a date that already has a stored
/// entry deletes it.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Entry {
    pub assignment_id: i64,
    pub date: NaiveDate,
    pub hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Entry {
    #[must_use]
    pub const fn new(assignment_id: i64, date: NaiveDate, hours: Option<f64>) -> Self {
        Self {
            assignment_id,
            date,
            hours,
            comment: None,
        }
    }

    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// The identity key of this entry.
    #[must_use]
    pub const fn key(&self) -> (i64, NaiveDate) {
        (self.assignment_id, self.date)
    }

    /// Booked hours, with "no booking" reported as zero.
    #[must_use]
    pub fn booked_hours(&self) -> f64 {
        self.hours.unwrap_or(0.0)
    }

    /// Whether the entry books a positive number of hours.
    #[must_use]
    pub fn is_booked(&self) -> bool {
        self.booked_hours() > 0.0
    }

    /// Reject negative or non-finite hours.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` describing the offending entry.
    pub fn validate(&self) -> Result<(), CoreError> {
        match self.hours {
            Some(h) if !h.is_finite() => Err(CoreError::Validation(format!(
                "entry for assignment {} on {} has non-finite hours",
                self.assignment_id, self.date
            ))),
            Some(h) if h < 0.0 => Err(CoreError::Validation(format!(
                "entry for assignment {} on {} has negative hours ({h})",
                self.assignment_id, self.date
            ))),
            _ => Ok(()),
        }
    }
}
