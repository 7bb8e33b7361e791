//! Inclusive calendar date ranges.

use chrono::{Days, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::CoreError;

/// An inclusive range of calendar dates, `start..=end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Create a range, rejecting `end < start`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the range is inverted.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CoreError> {
        if end < start {
            return Err(CoreError::Validation(format!(
                "date range ends before it starts: {start}..{end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// A single-day range.
    #[must_use]
    pub const fn day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// The seven-day range starting at `start`.
    ///
    /// Saturates at `NaiveDate::MAX` instead of overflowing.
    #[must_use]
    pub fn week_from(start: NaiveDate) -> Self {
        let end = start.checked_add_days(Days::new(6)).unwrap_or(NaiveDate::MAX);
        Self { start, end }
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}
