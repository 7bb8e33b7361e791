//! In-memory collaborators for guard tests.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use tg_core::entities::{Assignment, Comment, Entry, Manager, Project};
use tg_core::enums::{BudgetKind, StatusCode};
use tg_core::range::DateRange;
use tg_core::status::{AssignmentAggregate, AssignmentStatus, StatusPolicy};

use crate::error::GuardError;
use crate::guard::{BudgetGuard, Reconciliation};
use crate::notify::ManagerAlert;
use crate::ports::{AtomicReconciler, CommentStore, EntryStore, NotificationSink, StatusOracle};

pub fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2008, 4, day).unwrap()
}

pub fn entry(assignment_id: i64, day: u32, hours: Option<f64>) -> Entry {
    Entry::new(assignment_id, date(day), hours)
}

pub fn assignment(kind: BudgetKind, allotted: f64, overrun: f64) -> Assignment {
    assignment_with_id(1, kind, allotted, overrun)
}

pub fn assignment_with_id(id: i64, kind: BudgetKind, allotted: f64, overrun: f64) -> Assignment {
    Assignment {
        id,
        user_id: "thies".into(),
        project: Project {
            id: 10,
            name: "eHour".into(),
            manager: Some(Manager {
                name: "Project Manager".into(),
                email: "pm@example.com".into(),
            }),
        },
        kind,
        allotted_hours: allotted,
        allowed_overrun_hours: overrun,
        notify_pm: true,
        date_start: None,
        date_end: None,
    }
}

// ---------------------------------------------------------------------------
// Entry store
// ---------------------------------------------------------------------------

type EntryMap = BTreeMap<(i64, NaiveDate), Entry>;

#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<EntryMap>,
    calls: Mutex<Vec<String>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn with_entries(entries: impl IntoIterator<Item = Entry>) -> Self {
        let store = Self::default();
        store.restore(entries.into_iter().map(|e| (e.key(), e)).collect());
        store
    }

    pub fn snapshot(&self) -> EntryMap {
        self.entries.lock().unwrap().clone()
    }

    pub fn restore(&self, entries: EntryMap) {
        *self.entries.lock().unwrap() = entries;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls that mutate the store.
    pub fn writes(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with("insert") || c.starts_with("update") || c.starts_with("delete"))
            .collect()
    }

    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    fn log(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn check_writable(&self) -> anyhow::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            anyhow::bail!("store is read-only");
        }
        Ok(())
    }

    fn total_booked(&self, assignment_id: i64) -> f64 {
        self.entries
            .lock()
            .unwrap()
            .values()
            .filter(|e| e.assignment_id == assignment_id)
            .map(Entry::booked_hours)
            .sum()
    }
}

#[async_trait]
impl EntryStore for MemoryStore {
    async fn entries_in_range(
        &self,
        assignment_id: i64,
        range: &DateRange,
    ) -> anyhow::Result<Vec<Entry>> {
        self.log(format!("entries_in_range {assignment_id}"));
        Ok(self
            .entries
            .lock()
            .unwrap()
            .values()
            .filter(|e| e.assignment_id == assignment_id && range.contains(e.date))
            .cloned()
            .collect())
    }

    async fn insert(&self, entry: &Entry) -> anyhow::Result<()> {
        self.log(format!("insert {}", entry.date));
        self.check_writable()?;
        let mut entries = self.entries.lock().unwrap();
        anyhow::ensure!(!entries.contains_key(&entry.key()), "duplicate entry");
        entries.insert(entry.key(), entry.clone());
        Ok(())
    }

    async fn update(&self, entry: &Entry) -> anyhow::Result<()> {
        self.log(format!("update {}", entry.date));
        self.check_writable()?;
        let mut entries = self.entries.lock().unwrap();
        anyhow::ensure!(entries.contains_key(&entry.key()), "no entry to update");
        entries.insert(entry.key(), entry.clone());
        Ok(())
    }

    async fn delete(&self, entry: &Entry) -> anyhow::Result<()> {
        self.log(format!("delete {}", entry.date));
        self.check_writable()?;
        self.entries.lock().unwrap().remove(&entry.key());
        Ok(())
    }

    async fn latest_entry(&self, assignment_id: i64) -> anyhow::Result<Option<Entry>> {
        self.log(format!("latest_entry {assignment_id}"));
        Ok(self
            .entries
            .lock()
            .unwrap()
            .values()
            .filter(|e| e.assignment_id == assignment_id && e.is_booked())
            .max_by_key(|e| e.date)
            .cloned())
    }
}

// ---------------------------------------------------------------------------
// Status oracles
// ---------------------------------------------------------------------------

/// Replays canned snapshots; the last one repeats once the script runs out.
pub struct ScriptedOracle {
    script: Mutex<VecDeque<AssignmentStatus>>,
    calls: AtomicUsize,
    fail: bool,
}

impl ScriptedOracle {
    pub fn new(script: impl IntoIterator<Item = AssignmentStatus>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            calls: AtomicUsize::new(0),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
            fail: true,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatusOracle for ScriptedOracle {
    async fn status_of(&self, _assignment: &Assignment) -> anyhow::Result<AssignmentStatus> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            anyhow::bail!("oracle unavailable");
        }
        let mut script = self.script.lock().unwrap();
        let status = if script.len() > 1 {
            script.pop_front()
        } else {
            script.front().cloned()
        };
        Ok(status.unwrap_or_default())
    }
}

/// Derives budget codes from the hours currently in a [`MemoryStore`].
pub struct CeilingOracle<'a> {
    store: &'a MemoryStore,
    policy: StatusPolicy,
}

impl<'a> CeilingOracle<'a> {
    pub fn new(store: &'a MemoryStore) -> Self {
        Self {
            store,
            policy: StatusPolicy::default(),
        }
    }
}

#[async_trait]
impl StatusOracle for CeilingOracle<'_> {
    async fn status_of(&self, assignment: &Assignment) -> anyhow::Result<AssignmentStatus> {
        let booked = self.store.total_booked(assignment.id);
        let code = if booked <= assignment.allotted_hours {
            StatusCode::InAllotted
        } else if assignment.kind == BudgetKind::Fixed {
            StatusCode::OverAllotted
        } else if booked <= assignment.ceiling_hours() {
            StatusCode::InOverrun
        } else {
            StatusCode::OverOverrun
        };
        let aggregate = AssignmentAggregate {
            assignment_id: assignment.id,
            booked_hours: booked,
            allotted_hours: assignment.allotted_hours,
            allowed_overrun_hours: assignment.allowed_overrun_hours,
        };
        Ok(self
            .policy
            .snapshot(BTreeSet::from([code]), Some(aggregate)))
    }
}

// ---------------------------------------------------------------------------
// Sinks and comment store
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RecordingSink {
    alerts: Mutex<Vec<ManagerAlert>>,
}

impl RecordingSink {
    pub fn alerts(&self) -> Vec<ManagerAlert> {
        self.alerts.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn notify_manager_budget_reached(&self, alert: &ManagerAlert) -> anyhow::Result<()> {
        self.alerts.lock().unwrap().push(alert.clone());
        Ok(())
    }
}

pub struct FailingSink;

#[async_trait]
impl NotificationSink for FailingSink {
    async fn notify_manager_budget_reached(&self, _alert: &ManagerAlert) -> anyhow::Result<()> {
        anyhow::bail!("smtp relay refused connection")
    }
}

#[derive(Default)]
pub struct MemoryComments {
    comments: Mutex<Vec<Comment>>,
}

impl MemoryComments {
    pub fn comments(&self) -> Vec<Comment> {
        self.comments.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommentStore for MemoryComments {
    async fn persist_comment(&self, comment: &Comment) -> anyhow::Result<()> {
        self.comments.lock().unwrap().push(comment.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Transaction boundary
// ---------------------------------------------------------------------------

/// Snapshot/restore stand-in for a storage transaction.
#[derive(Default)]
pub struct MemoryReconciler {
    pub store: MemoryStore,
    /// Assignment whose reconciliation fails with a store error.
    pub fatal_assignment: Option<i64>,
    /// Replaces the [`CeilingOracle`] when set.
    pub scripted: Option<ScriptedOracle>,
}

#[async_trait]
impl AtomicReconciler for MemoryReconciler {
    async fn reconcile_atomically(
        &self,
        assignment: &Assignment,
        proposed: &[Entry],
        range: &DateRange,
    ) -> Result<Reconciliation, GuardError> {
        if self.fatal_assignment == Some(assignment.id) {
            return Err(GuardError::Store(anyhow::anyhow!("disk I/O error")));
        }
        let checkpoint = self.store.snapshot();
        let ceiling = CeilingOracle::new(&self.store);
        let oracle: &dyn StatusOracle = match &self.scripted {
            Some(scripted) => scripted,
            None => &ceiling,
        };
        let guard = BudgetGuard::new(&self.store, oracle, StatusCode::InOverrun);
        let outcome = guard.reconcile(assignment, proposed, range).await;
        if outcome.is_err() {
            self.store.restore(checkpoint);
        }
        outcome
    }
}
