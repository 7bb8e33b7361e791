//! Shared test utilities for tg-db unit tests.

use chrono::NaiveDate;
use tg_core::entities::{Assignment, Manager};
use tg_core::enums::BudgetKind;

use crate::TimesheetDb;
use crate::repos::assignment::NewAssignment;

pub async fn test_db() -> TimesheetDb {
    TimesheetDb::open_local(":memory:").await.unwrap()
}

pub fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2008, 4, day).unwrap()
}

/// Create a managed project and one assignment on it.
pub async fn seed_assignment(
    db: &TimesheetDb,
    kind: BudgetKind,
    allotted: f64,
    overrun: f64,
) -> Assignment {
    let manager = Manager {
        name: "Project Manager".into(),
        email: "pm@example.com".into(),
    };
    let project = match db.find_project_by_name("eHour").await.unwrap() {
        Some(project) => project,
        None => db.create_project("eHour", Some(&manager)).await.unwrap(),
    };
    db.create_assignment(&NewAssignment {
        user_id: "thies".into(),
        project_id: project.id,
        kind,
        allotted_hours: allotted,
        allowed_overrun_hours: overrun,
        notify_pm: true,
        date_start: None,
        date_end: None,
    })
    .await
    .unwrap()
}
