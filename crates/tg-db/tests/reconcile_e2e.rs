//! End-to-end reconciliation against a libSQL database.
//!
//! Every test goes through `TimesheetService` wired to the SQL collaborators,
//! so each reconciliation runs in its own `BEGIN IMMEDIATE` transaction.

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use tg_core::entities::{Assignment, Comment, Entry, Manager};
use tg_core::enums::{AlertKind, BudgetKind, StatusCode};
use tg_core::range::DateRange;
use tg_core::sheet::{Booking, WeekSheet};
use tg_core::status::StatusPolicy;
use tg_db::TimesheetDb;
use tg_db::repos::alert::AlertOutbox;
use tg_db::repos::assignment::NewAssignment;
use tg_db::repos::comment::CommentRepo;
use tg_db::repos::entry::EntryRepo;
use tg_guard::{AssignmentBatch, EntryStore, GuardError};

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2008, 4, day).unwrap()
}

fn week() -> DateRange {
    DateRange::week_from(date(7))
}

async fn setup() -> TimesheetDb {
    let db = TimesheetDb::open_local(":memory:").await.unwrap();
    db.create_project(
        "eHour",
        Some(&Manager {
            name: "Project Manager".into(),
            email: "pm@example.com".into(),
        }),
    )
    .await
    .unwrap();
    db
}

async fn add_assignment(db: &TimesheetDb, kind: BudgetKind, allotted: f64, overrun: f64) -> Assignment {
    let project = db.find_project_by_name("eHour").await.unwrap().unwrap();
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

async fn stored(db: &TimesheetDb, assignment_id: i64) -> Vec<Entry> {
    EntryRepo::new(db.conn())
        .list_for_assignment(assignment_id)
        .await
        .unwrap()
}

#[tokio::test]
async fn resubmission_is_a_noop() {
    let db = setup().await;
    let assignment = add_assignment(&db, BudgetKind::Fixed, 40.0, 0.0).await;
    let service = db.service(StatusPolicy::default());
    let proposed = [
        Entry::new(assignment.id, date(7), Some(8.0)),
        Entry::new(assignment.id, date(8), Some(8.0)),
    ];

    let first = service.reconcile(&assignment, &proposed, &week()).await.unwrap();
    assert_eq!(first.changes.inserted, 2);

    let second = service.reconcile(&assignment, &proposed, &week()).await.unwrap();
    assert!(second.changes.is_noop());
    assert_eq!(stored(&db, assignment.id).await, proposed.to_vec());
}

#[tokio::test]
async fn stored_range_matches_proposed_bookings() {
    let db = setup().await;
    let assignment = add_assignment(&db, BudgetKind::Fixed, 40.0, 0.0).await;
    let service = db.service(StatusPolicy::default());

    service
        .reconcile(
            &assignment,
            &[
                Entry::new(assignment.id, date(7), Some(8.0)),
                Entry::new(assignment.id, date(8), Some(8.0)),
            ],
            &week(),
        )
        .await
        .unwrap();

    let outcome = service
        .reconcile(
            &assignment,
            &[
                Entry::new(assignment.id, date(7), Some(4.0)),
                Entry::new(assignment.id, date(8), None),
                Entry::new(assignment.id, date(9), Some(0.0)),
            ],
            &week(),
        )
        .await
        .unwrap();

    assert_eq!(outcome.changes.updated, 1);
    assert_eq!(outcome.changes.deleted, 1);
    assert_eq!(outcome.changes.inserted, 0);
    assert_eq!(
        stored(&db, assignment.id).await,
        vec![Entry::new(assignment.id, date(7), Some(4.0))]
    );
}

#[tokio::test]
async fn over_budget_growth_is_rolled_back() {
    let db = setup().await;
    let assignment = add_assignment(&db, BudgetKind::Fixed, 10.0, 0.0).await;
    let service = db.service(StatusPolicy::default());

    service
        .reconcile(&assignment, &[Entry::new(assignment.id, date(7), Some(8.0))], &week())
        .await
        .unwrap();

    let err = service
        .reconcile(
            &assignment,
            &[
                Entry::new(assignment.id, date(7), Some(6.0)),
                Entry::new(assignment.id, date(8), Some(6.0)),
            ],
            &week(),
        )
        .await
        .unwrap_err();

    let GuardError::OverBudget(over) = err else {
        panic!("expected OverBudget");
    };
    assert!(over.status.contains(StatusCode::OverAllotted));
    assert_eq!(
        stored(&db, assignment.id).await,
        vec![Entry::new(assignment.id, date(7), Some(8.0))],
        "aborted mutations must not be visible"
    );
}

#[tokio::test]
async fn decrease_on_invalid_assignment_commits_but_growth_does_not() {
    let db = setup().await;
    let assignment = add_assignment(&db, BudgetKind::Fixed, 8.0, 0.0).await;
    // Pre-existing overbooking written outside the guard.
    EntryRepo::new(db.conn())
        .insert(&Entry::new(assignment.id, date(7), Some(12.0)))
        .await
        .unwrap();
    let service = db.service(StatusPolicy::default());

    let outcome = service
        .reconcile(&assignment, &[Entry::new(assignment.id, date(7), Some(10.0))], &week())
        .await
        .unwrap();
    assert!(outcome.after.is_invalid());
    assert!(!outcome.changes.any_increase);

    let err = service
        .reconcile(&assignment, &[Entry::new(assignment.id, date(8), Some(0.5))], &week())
        .await
        .unwrap_err();
    assert!(err.is_over_budget());
    assert_eq!(
        stored(&db, assignment.id).await,
        vec![Entry::new(assignment.id, date(7), Some(10.0))]
    );
}

#[tokio::test]
async fn crossing_into_overrun_queues_one_alert() {
    let db = setup().await;
    let assignment = add_assignment(&db, BudgetKind::Flex, 8.0, 8.0).await;
    let service = db.service(StatusPolicy::default());

    service
        .reconcile(&assignment, &[Entry::new(assignment.id, date(7), Some(8.0))], &week())
        .await
        .unwrap();
    service
        .reconcile(&assignment, &[Entry::new(assignment.id, date(8), Some(2.0))], &week())
        .await
        .unwrap();
    service
        .reconcile(&assignment, &[Entry::new(assignment.id, date(9), Some(2.0))], &week())
        .await
        .unwrap();

    let alerts = AlertOutbox::new(db.conn()).list(Some(assignment.id)).await.unwrap();
    assert_eq!(alerts.len(), 1);
    let alert = &alerts[0].alert;
    assert_eq!(alert.kind, AlertKind::FlexAllottedReached);
    assert_eq!(alert.reached, StatusCode::InOverrun);
    assert_eq!(alert.booked_until, Some(date(8)));
    assert_eq!(alert.manager.email, "pm@example.com");
    assert_eq!(alert.aggregate.as_ref().map(|a| a.booked_hours), Some(10.0));
}

#[tokio::test]
async fn weekly_sheet_isolates_rejected_assignment() {
    let db = setup().await;
    let roomy = add_assignment(&db, BudgetKind::Fixed, 40.0, 0.0).await;
    let tight = add_assignment(&db, BudgetKind::Fixed, 4.0, 0.0).await;
    let service = db.service(StatusPolicy::default());

    let sheet = WeekSheet {
        user_id: "thies".into(),
        week_start: date(7),
        comment: Some("release week".into()),
        bookings: vec![
            Booking {
                assignment_id: roomy.id,
                date: date(7),
                hours: Some(8.0),
                comment: None,
            },
            Booking {
                assignment_id: tight.id,
                date: date(7),
                hours: Some(8.0),
                comment: None,
            },
        ],
    };
    let batches = vec![
        AssignmentBatch {
            assignment: roomy.clone(),
            entries: sheet.entries_by_assignment()[0].1.clone(),
        },
        AssignmentBatch {
            assignment: tight.clone(),
            entries: sheet.entries_by_assignment()[1].1.clone(),
        },
    ];

    let err = service
        .persist_week(&batches, sheet.comment().as_ref(), &sheet.range())
        .await
        .unwrap_err();

    let GuardError::AggregatedOverBudget(aggregated) = err else {
        panic!("expected AggregatedOverBudget");
    };
    assert_eq!(aggregated.failures.keys().copied().collect::<Vec<_>>(), vec![tight.id]);
    assert_eq!(aggregated.committed, vec![roomy.id]);
    assert_eq!(stored(&db, roomy.id).await.len(), 1);
    assert!(stored(&db, tight.id).await.is_empty());

    let comment = CommentRepo::new(db.conn())
        .get("thies", date(7))
        .await
        .unwrap();
    assert_eq!(
        comment,
        Some(Comment {
            user_id: "thies".into(),
            week_start: date(7),
            text: "release week".into(),
        })
    );
}

#[tokio::test]
async fn file_database_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("timeguard.db");
    let path = path.to_string_lossy();

    let assignment_id = {
        let db = TimesheetDb::open_local(&path).await.unwrap();
        let project = db.create_project("eHour", None).await.unwrap();
        let assignment = db
            .create_assignment(&NewAssignment {
                user_id: "thies".into(),
                project_id: project.id,
                kind: BudgetKind::Fixed,
                allotted_hours: 40.0,
                allowed_overrun_hours: 0.0,
                notify_pm: false,
                date_start: None,
                date_end: None,
            })
            .await
            .unwrap();
        db.service(StatusPolicy::default())
            .reconcile(&assignment, &[Entry::new(assignment.id, date(7), Some(8.0))], &week())
            .await
            .unwrap();
        assignment.id
    };

    let reopened = TimesheetDb::open_local(&path).await.unwrap();
    assert_eq!(stored(&reopened, assignment_id).await.len(), 1);
}

#[tokio::test]
async fn resubmitting_without_comment_keeps_stored_comment() {
    let db = setup().await;
    let assignment = add_assignment(&db, BudgetKind::Fixed, 40.0, 0.0).await;
    let service = db.service(StatusPolicy::default());
    let mut sheet = WeekSheet {
        user_id: "thies".into(),
        week_start: date(7),
        comment: Some("release week".into()),
        bookings: vec![Booking {
            assignment_id: assignment.id,
            date: date(7),
            hours: Some(8.0),
            comment: None,
        }],
    };
    let batches = vec![AssignmentBatch {
        assignment: assignment.clone(),
        entries: sheet.entries_by_assignment()[0].1.clone(),
    }];

    service
        .persist_week(&batches, sheet.comment().as_ref(), &sheet.range())
        .await
        .unwrap();
    sheet.comment = None;
    service
        .persist_week(&batches, sheet.comment().as_ref(), &sheet.range())
        .await
        .unwrap();

    let comment = CommentRepo::new(db.conn()).get("thies", date(7)).await.unwrap();
    assert_eq!(comment.map(|c| c.text), Some("release week".to_string()));
}
