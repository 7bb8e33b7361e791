//! Timesheet entry repository.

use async_trait::async_trait;
use chrono::Utc;
use tg_core::entities::Entry;
use tg_core::range::DateRange;
use tg_guard::EntryStore;

use crate::error::DatabaseError;
use crate::helpers::{date_param, get_opt_string, parse_date};

const SELECT_COLS: &str = "assignment_id, entry_date, hours, comment";

fn row_to_entry(row: &libsql::Row) -> Result<Entry, DatabaseError> {
    Ok(Entry {
        assignment_id: row.get(0)?,
        date: parse_date(&row.get::<String>(1)?)?,
        hours: row.get::<Option<f64>>(2)?,
        comment: get_opt_string(row, 3)?,
    })
}

/// Entry store over a borrowed connection or transaction.
pub struct EntryRepo<'a> {
    conn: &'a libsql::Connection,
}

impl<'a> EntryRepo<'a> {
    #[must_use]
    pub const fn new(conn: &'a libsql::Connection) -> Self {
        Self { conn }
    }

    async fn collect(&self, mut rows: libsql::Rows) -> Result<Vec<Entry>, DatabaseError> {
        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            entries.push(row_to_entry(&row)?);
        }
        Ok(entries)
    }

    /// All stored entries of an assignment, ordered by date.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or a row is malformed.
    pub async fn list_for_assignment(&self, assignment_id: i64) -> Result<Vec<Entry>, DatabaseError> {
        let rows = self
            .conn
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM timesheet_entries
                     WHERE assignment_id = ?1 ORDER BY entry_date"
                ),
                [assignment_id],
            )
            .await?;
        self.collect(rows).await
    }
}

#[async_trait]
impl EntryStore for EntryRepo<'_> {
    async fn entries_in_range(
        &self,
        assignment_id: i64,
        range: &DateRange,
    ) -> anyhow::Result<Vec<Entry>> {
        let rows = self
            .conn
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM timesheet_entries
                     WHERE assignment_id = ?1 AND entry_date BETWEEN ?2 AND ?3
                     ORDER BY entry_date"
                ),
                libsql::params![
                    assignment_id,
                    date_param(range.start),
                    date_param(range.end)
                ],
            )
            .await?;
        Ok(self.collect(rows).await?)
    }

    async fn insert(&self, entry: &Entry) -> anyhow::Result<()> {
        self.conn
            .execute(
                &format!(
                    "INSERT INTO timesheet_entries ({SELECT_COLS}, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5)"
                ),
                libsql::params![
                    entry.assignment_id,
                    date_param(entry.date),
                    entry.hours,
                    entry.comment.as_deref(),
                    Utc::now().to_rfc3339()
                ],
            )
            .await?;
        Ok(())
    }

    async fn update(&self, entry: &Entry) -> anyhow::Result<()> {
        let changed = self
            .conn
            .execute(
                "UPDATE timesheet_entries SET hours = ?3, comment = ?4, updated_at = ?5
                 WHERE assignment_id = ?1 AND entry_date = ?2",
                libsql::params![
                    entry.assignment_id,
                    date_param(entry.date),
                    entry.hours,
                    entry.comment.as_deref(),
                    Utc::now().to_rfc3339()
                ],
            )
            .await?;
        if changed == 0 {
            anyhow::bail!(DatabaseError::NotFound {
                entity: "entry",
                id: format!("{}@{}", entry.assignment_id, entry.date),
            });
        }
        Ok(())
    }

    async fn delete(&self, entry: &Entry) -> anyhow::Result<()> {
        self.conn
            .execute(
                "DELETE FROM timesheet_entries WHERE assignment_id = ?1 AND entry_date = ?2",
                libsql::params![entry.assignment_id, date_param(entry.date)],
            )
            .await?;
        Ok(())
    }

    async fn latest_entry(&self, assignment_id: i64) -> anyhow::Result<Option<Entry>> {
        let mut rows = self
            .conn
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM timesheet_entries
                     WHERE assignment_id = ?1 AND hours > 0
                     ORDER BY entry_date DESC LIMIT 1"
                ),
                [assignment_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_entry(&row)?)),
            None => Ok(None),
        }
    }
}
