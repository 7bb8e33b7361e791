//! Project repository.

use tg_core::entities::{Manager, Project};

use crate::TimesheetDb;
use crate::error::DatabaseError;
use crate::helpers::get_opt_string;

const SELECT_COLS: &str = "id, name, manager_name, manager_email";

/// Build a project from four columns starting at `offset`.
pub(crate) fn row_to_project(row: &libsql::Row, offset: i32) -> Result<Project, DatabaseError> {
    let manager = match (
        get_opt_string(row, offset + 2)?,
        get_opt_string(row, offset + 3)?,
    ) {
        (Some(name), Some(email)) => Some(Manager { name, email }),
        _ => None,
    };
    Ok(Project {
        id: row.get(offset)?,
        name: row.get(offset + 1)?,
        manager,
    })
}

impl TimesheetDb {
    /// # Errors
    ///
    /// Returns `DatabaseError` if the insert fails, e.g. on a duplicate name.
    pub async fn create_project(
        &self,
        name: &str,
        manager: Option<&Manager>,
    ) -> Result<Project, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "INSERT INTO projects (name, manager_name, manager_email)
                 VALUES (?1, ?2, ?3) RETURNING id",
                libsql::params![
                    name,
                    manager.map(|m| m.name.as_str()),
                    manager.map(|m| m.email.as_str())
                ],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        let project = Project {
            id: row.get(0)?,
            name: name.to_string(),
            manager: manager.cloned(),
        };
        tracing::info!(project_id = project.id, name, "created project");
        Ok(project)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if no project has this id.
    pub async fn get_project(&self, id: i64) -> Result<Project, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM projects WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or_else(|| DatabaseError::NotFound {
            entity: "project",
            id: id.to_string(),
        })?;
        row_to_project(&row, 0)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn find_project_by_name(&self, name: &str) -> Result<Option<Project>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM projects WHERE name = ?1"),
                [name],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_project(&row, 0)?)),
            None => Ok(None),
        }
    }
}
