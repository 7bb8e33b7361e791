//! The weekly sheet: one user's proposed bookings for a week.
//!
//! This is the input format accepted by `tg book`. A sheet spans several
//! assignments; [`WeekSheet::entries_by_assignment`] splits it into one batch
//! per assignment for the weekly orchestrator.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Comment, Entry};
use crate::range::DateRange;

/// A single proposed booking in a weekly sheet.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Booking {
    pub assignment_id: i64,
    pub date: NaiveDate,
    /// Hours to book. `null` or `0` clears an existing booking.
    #[serde(default)]
    pub hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl From<&Booking> for Entry {
    fn from(booking: &Booking) -> Self {
        Self {
            assignment_id: booking.assignment_id,
            date: booking.date,
            hours: booking.hours,
            comment: booking.comment.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct WeekSheet {
    pub user_id: String,
    /// First day of the week; the sheet covers seven days from here.
    pub week_start: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default)]
    pub bookings: Vec<Booking>,
}

impl WeekSheet {
    #[must_use]
    pub fn range(&self) -> DateRange {
        DateRange::week_from(self.week_start)
    }

    /// The week comment, if the sheet carries one.
    ///
    /// `None` means "leave the stored comment alone"; an explicit empty string
    /// clears it.
    #[must_use]
    pub fn comment(&self) -> Option<Comment> {
        self.comment.as_ref().map(|text| Comment {
            user_id: self.user_id.clone(),
            week_start: self.week_start,
            text: text.clone(),
        })
    }

    /// Bookings grouped per assignment, in the order assignments first appear.
    #[must_use]
    pub fn entries_by_assignment(&self) -> Vec<(i64, Vec<Entry>)> {
        let mut groups: Vec<(i64, Vec<Entry>)> = Vec::new();
        for booking in &self.bookings {
            match groups.iter_mut().find(|(id, _)| *id == booking.assignment_id) {
                Some((_, entries)) => entries.push(booking.into()),
                None => groups.push((booking.assignment_id, vec![booking.into()])),
            }
        }
        groups
    }
}
