//! Reconciliation engine: proposed entries vs. stored entries.
//!
//! Planning is pure ([`plan_edits`]); applying the plan is the only step that
//! touches an [`EntryStore`]. Per proposed date:
//!
//! | stored | proposed hours      | edit                    |
//! |--------|---------------------|-------------------------|
//! | none   | null / zero         | none                    |
//! | none   | > 0                 | insert                  |
//! | some   | null / zero         | delete                  |
//! | some   | different           | update                  |
//! | some   | equal, comment diff | update (comment only)   |
//! | some   | equal               | none                    |

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use tg_core::entities::Entry;
use tg_core::range::DateRange;

use crate::ports::EntryStore;

/// A single storage operation produced by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryEdit {
    Insert(Entry),
    Update { previous: Entry, next: Entry },
    Delete(Entry),
}

impl EntryEdit {
    /// Whether the edit grows the booked hours of its date.
    ///
    /// A missing prior entry counts as zero hours.
    #[must_use]
    pub fn is_increase(&self) -> bool {
        match self {
            Self::Insert(entry) => entry.is_booked(),
            Self::Update { previous, next } => next.booked_hours() > previous.booked_hours(),
            Self::Delete(_) => false,
        }
    }

    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        match self {
            Self::Insert(entry) | Self::Delete(entry) | Self::Update { next: entry, .. } => {
                entry.date
            }
        }
    }
}

/// What one reconciliation did to the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChangeSummary {
    pub inserted: usize,
    pub updated: usize,
    pub deleted: usize,
    /// At least one edit grew the booked hours of a date.
    pub any_increase: bool,
}

impl ChangeSummary {
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.inserted == 0 && self.updated == 0 && self.deleted == 0
    }

    fn record(&mut self, edit: &EntryEdit) {
        match edit {
            EntryEdit::Insert(_) => self.inserted += 1,
            EntryEdit::Update { .. } => self.updated += 1,
            EntryEdit::Delete(_) => self.deleted += 1,
        }
        self.any_increase |= edit.is_increase();
    }
}

fn same_hours(a: f64, b: f64) -> bool {
    (a - b).abs() < f64::EPSILON
}

/// Compute the edits that make `stored` match `proposed` within `range`.
///
/// Proposed entries for another assignment or outside `range` are skipped
/// with a warning. When a date is proposed twice the last mention wins.
/// Stored entries whose date is not proposed are left alone.
#[must_use]
pub fn plan_edits(
    assignment_id: i64,
    range: &DateRange,
    proposed: &[Entry],
    stored: &[Entry],
) -> Vec<EntryEdit> {
    let mut by_date: BTreeMap<NaiveDate, &Entry> = BTreeMap::new();
    for entry in proposed {
        if entry.assignment_id != assignment_id {
            tracing::warn!(
                assignment_id,
                entry_assignment_id = entry.assignment_id,
                date = %entry.date,
                "skipping proposed entry for another assignment"
            );
            continue;
        }
        if !range.contains(entry.date) {
            tracing::warn!(
                assignment_id,
                date = %entry.date,
                %range,
                "skipping proposed entry outside the reconciled range"
            );
            continue;
        }
        by_date.insert(entry.date, entry);
    }

    let stored: BTreeMap<NaiveDate, &Entry> = stored
        .iter()
        .filter(|e| e.assignment_id == assignment_id && range.contains(e.date))
        .map(|e| (e.date, e))
        .collect();

    by_date
        .into_values()
        .filter_map(|next| match stored.get(&next.date) {
            None if next.is_booked() => Some(EntryEdit::Insert(next.clone())),
            None => None,
            Some(previous) if !next.is_booked() => Some(EntryEdit::Delete((*previous).clone())),
            Some(previous)
                if !same_hours(previous.booked_hours(), next.booked_hours())
                    || previous.comment != next.comment =>
            {
                Some(EntryEdit::Update {
                    previous: (*previous).clone(),
                    next: next.clone(),
                })
            }
            Some(_) => None,
        })
        .collect()
}

/// Apply `edits` in order, stopping at the first store failure.
///
/// # Errors
///
/// Returns the store's error unchanged.
pub async fn apply_edits(
    store: &dyn EntryStore,
    edits: &[EntryEdit],
) -> anyhow::Result<ChangeSummary> {
    let mut summary = ChangeSummary::default();
    for edit in edits {
        match edit {
            EntryEdit::Insert(entry) => store.insert(entry).await?,
            EntryEdit::Update { next, .. } => store.update(next).await?,
            EntryEdit::Delete(entry) => store.delete(entry).await?,
        }
        summary.record(edit);
    }
    tracing::debug!(
        inserted = summary.inserted,
        updated = summary.updated,
        deleted = summary.deleted,
        any_increase = summary.any_increase,
        "applied entry edits"
    );
    Ok(summary)
}
