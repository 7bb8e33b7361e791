//! # tg-db
//!
//! libSQL storage for Timeguard.
//!
//! Provides the concrete collaborators the guard consumes: an entry store, a
//! status oracle implementing the eHour budget rules, a comment store, a
//! manager-alert outbox, and the per-assignment transaction boundary.
//! Project and assignment CRUD lives on [`TimesheetDb`] directly.

pub mod error;
pub mod helpers;
mod migrations;
pub mod oracle;
pub mod reconciler;
pub mod repos;

#[cfg(test)]
mod test_support;

use error::DatabaseError;
use libsql::Builder;
use tg_config::DatabaseConfig;
use tg_core::status::StatusPolicy;
use tg_guard::TimesheetService;

use crate::reconciler::SqlReconciler;
use crate::repos::alert::AlertOutbox;
use crate::repos::comment::CommentRepo;

/// Service wired to libSQL collaborators borrowed from one [`TimesheetDb`].
pub type SqlTimesheetService<'a> =
    TimesheetService<SqlReconciler<'a>, CommentRepo<'a>, AlertOutbox<'a>>;

/// Database handle for all Timeguard state.
pub struct TimesheetDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl TimesheetDb {
    /// Open a local database at the given path, or `":memory:"`.
    ///
    /// Runs migrations automatically on open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Foreign keys are per-connection in SQLite
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let tg_db = Self { db, conn };
        tg_db.run_migrations().await?;
        tracing::debug!(path, "opened timesheet database");
        Ok(tg_db)
    }

    /// Open the database named by the `[database]` configuration section.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        Self::open_local(&config.path).await
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Build a [`TimesheetService`] backed by this database.
    #[must_use]
    pub fn service(&self, policy: StatusPolicy) -> SqlTimesheetService<'_> {
        TimesheetService::new(
            SqlReconciler::new(self, policy),
            CommentRepo::new(&self.conn),
            AlertOutbox::new(&self.conn),
        )
    }
}
