//! Manager alert outbox.
//!
//! Alerts are appended to `manager_alerts` rather than sent directly; a
//! mailer or the `tg alerts` command drains them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tg_core::entities::Manager;
use tg_core::status::AssignmentAggregate;
use tg_guard::{ManagerAlert, NotificationSink};

use crate::error::DatabaseError;
use crate::helpers::{date_param, get_opt_string, parse_datetime, parse_enum, parse_optional_date};

const SELECT_COLS: &str = "id, assignment_id, project_id, user_id, manager_name, manager_email, \
     kind, reached, booked_hours, allotted_hours, allowed_overrun_hours, booked_until, created_at";

/// An alert as queued in the outbox.
#[derive(Debug, Clone, Serialize)]
pub struct QueuedAlert {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub alert: ManagerAlert,
}

fn row_to_alert(row: &libsql::Row) -> Result<QueuedAlert, DatabaseError> {
    let assignment_id: i64 = row.get(1)?;
    let aggregate = match (
        row.get::<Option<f64>>(8)?,
        row.get::<Option<f64>>(9)?,
        row.get::<Option<f64>>(10)?,
    ) {
        (Some(booked_hours), Some(allotted_hours), Some(allowed_overrun_hours)) => {
            Some(AssignmentAggregate {
                assignment_id,
                booked_hours,
                allotted_hours,
                allowed_overrun_hours,
            })
        }
        _ => None,
    };
    Ok(QueuedAlert {
        id: row.get(0)?,
        created_at: parse_datetime(&row.get::<String>(12)?)?,
        alert: ManagerAlert {
            assignment_id,
            project_id: row.get(2)?,
            user_id: row.get(3)?,
            manager: Manager {
                name: row.get(4)?,
                email: row.get(5)?,
            },
            kind: parse_enum(&row.get::<String>(6)?)?,
            reached: parse_enum(&row.get::<String>(7)?)?,
            aggregate,
            booked_until: parse_optional_date(get_opt_string(row, 11)?.as_deref())?,
        },
    })
}

pub struct AlertOutbox<'a> {
    conn: &'a libsql::Connection,
}

impl<'a> AlertOutbox<'a> {
    #[must_use]
    pub const fn new(conn: &'a libsql::Connection) -> Self {
        Self { conn }
    }

    /// Queued alerts, oldest first, optionally for one assignment.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or a row is malformed.
    pub async fn list(&self, assignment_id: Option<i64>) -> Result<Vec<QueuedAlert>, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM manager_alerts
                     WHERE ?1 IS NULL OR assignment_id = ?1 ORDER BY id"
                ),
                libsql::params![assignment_id],
            )
            .await?;
        let mut alerts = Vec::new();
        while let Some(row) = rows.next().await? {
            alerts.push(row_to_alert(&row)?);
        }
        Ok(alerts)
    }
}

#[async_trait]
impl NotificationSink for AlertOutbox<'_> {
    async fn notify_manager_budget_reached(&self, alert: &ManagerAlert) -> anyhow::Result<()> {
        let aggregate = alert.aggregate.as_ref();
        self.conn
            .execute(
                "INSERT INTO manager_alerts (assignment_id, project_id, user_id, manager_name,
                     manager_email, kind, reached, booked_hours, allotted_hours,
                     allowed_overrun_hours, booked_until, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                libsql::params![
                    alert.assignment_id,
                    alert.project_id,
                    alert.user_id.as_str(),
                    alert.manager.name.as_str(),
                    alert.manager.email.as_str(),
                    alert.kind.as_str(),
                    alert.reached.as_str(),
                    aggregate.map(|a| a.booked_hours),
                    aggregate.map(|a| a.allotted_hours),
                    aggregate.map(|a| a.allowed_overrun_hours),
                    alert.booked_until.map(date_param),
                    Utc::now().to_rfc3339()
                ],
            )
            .await?;
        tracing::debug!(
            assignment_id = alert.assignment_id,
            kind = %alert.kind,
            "queued manager alert"
        );
        Ok(())
    }
}
