//! Assignment repository.
//!
//! Assignments are read-only to the guard; they are created here and read
//! joined with their project so the manager travels with them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tg_core::entities::Assignment;
use tg_core::enums::BudgetKind;

use crate::TimesheetDb;
use crate::error::DatabaseError;
use crate::helpers::{date_param, get_opt_string, parse_enum, parse_optional_date};
use crate::repos::project::row_to_project;

const SELECT_COLS: &str = "a.id, a.user_id, a.kind, a.allotted_hours, a.allowed_overrun_hours, \
     a.notify_pm, a.date_start, a.date_end, p.id, p.name, p.manager_name, p.manager_email";

fn row_to_assignment(row: &libsql::Row) -> Result<Assignment, DatabaseError> {
    Ok(Assignment {
        id: row.get(0)?,
        user_id: row.get(1)?,
        kind: parse_enum(&row.get::<String>(2)?)?,
        allotted_hours: row.get(3)?,
        allowed_overrun_hours: row.get(4)?,
        notify_pm: row.get::<i64>(5)? != 0,
        date_start: parse_optional_date(get_opt_string(row, 6)?.as_deref())?,
        date_end: parse_optional_date(get_opt_string(row, 7)?.as_deref())?,
        project: row_to_project(row, 8)?,
    })
}

/// Input for [`TimesheetDb::create_assignment`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAssignment {
    pub user_id: String,
    pub project_id: i64,
    pub kind: BudgetKind,
    pub allotted_hours: f64,
    pub allowed_overrun_hours: f64,
    pub notify_pm: bool,
    pub date_start: Option<NaiveDate>,
    pub date_end: Option<NaiveDate>,
}

impl TimesheetDb {
    /// # Errors
    ///
    /// Returns `DatabaseError` if the project does not exist or the insert fails.
    pub async fn create_assignment(&self, new: &NewAssignment) -> Result<Assignment, DatabaseError> {
        if let (Some(start), Some(end)) = (new.date_start, new.date_end) {
            if end < start {
                return Err(DatabaseError::Query(format!(
                    "assignment period ends before it starts: {start}..{end}"
                )));
            }
        }
        let mut rows = self
            .conn()
            .query(
                "INSERT INTO assignments (user_id, project_id, kind, allotted_hours,
                     allowed_overrun_hours, notify_pm, date_start, date_end)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8) RETURNING id",
                libsql::params![
                    new.user_id.as_str(),
                    new.project_id,
                    new.kind.as_str(),
                    new.allotted_hours,
                    new.allowed_overrun_hours,
                    i64::from(new.notify_pm),
                    new.date_start.map(date_param),
                    new.date_end.map(date_param)
                ],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        let id: i64 = row.get(0)?;
        drop(rows);
        tracing::info!(
            assignment_id = id,
            user_id = %new.user_id,
            project_id = new.project_id,
            kind = %new.kind,
            "created assignment"
        );
        self.get_assignment(id).await
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if no assignment has this id.
    pub async fn get_assignment(&self, id: i64) -> Result<Assignment, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM assignments a
                     JOIN projects p ON p.id = a.project_id WHERE a.id = ?1"
                ),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or_else(|| DatabaseError::NotFound {
            entity: "assignment",
            id: id.to_string(),
        })?;
        row_to_assignment(&row)
    }

    /// All assignments of a user, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or a row is malformed.
    pub async fn list_assignments(&self, user_id: &str) -> Result<Vec<Assignment>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM assignments a
                     JOIN projects p ON p.id = a.project_id
                     WHERE a.user_id = ?1 ORDER BY a.id"
                ),
                [user_id],
            )
            .await?;
        let mut assignments = Vec::new();
        while let Some(row) = rows.next().await? {
            assignments.push(row_to_assignment(&row)?);
        }
        Ok(assignments)
    }
}
