use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use tg_core::range::DateRange;
use tg_core::sheet::WeekSheet;
use tg_db::TimesheetDb;
use tg_guard::{AssignmentBatch, GuardError, Reconciliation};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::BookArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct BookResponse {
    user_id: String,
    week: DateRange,
    alerts_sent: usize,
    reconciled: Vec<Reconciliation>,
}

/// Handle `tg book`.
pub async fn handle(args: &BookArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let sheet = read_sheet(&args.file)?;
    let batches = resolve_batches(&ctx.db, &sheet).await?;
    let service = ctx.db.service(ctx.policy());

    match service
        .persist_week(&batches, sheet.comment().as_ref(), &sheet.range())
        .await
    {
        Ok(summary) => output(
            &BookResponse {
                user_id: sheet.user_id.clone(),
                week: sheet.range(),
                alerts_sent: summary.alerts_sent(),
                reconciled: summary.reconciled,
            },
            flags.format,
        ),
        Err(GuardError::AggregatedOverBudget(rejected)) => {
            output(&rejected, flags.format)?;
            anyhow::bail!("{rejected}")
        }
        Err(error) => Err(error).context("failed to book weekly timesheet"),
    }
}

fn read_sheet(path: &Path) -> anyhow::Result<WeekSheet> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read timesheet file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("invalid timesheet file {}", path.display()))
}

/// Load the assignment of every group in the sheet, checking ownership.
async fn resolve_batches(db: &TimesheetDb, sheet: &WeekSheet) -> anyhow::Result<Vec<AssignmentBatch>> {
    let mut batches = Vec::new();
    for (assignment_id, entries) in sheet.entries_by_assignment() {
        let assignment = db
            .get_assignment(assignment_id)
            .await
            .with_context(|| format!("unknown assignment {assignment_id} in timesheet"))?;
        if assignment.user_id != sheet.user_id {
            anyhow::bail!(
                "assignment {assignment_id} belongs to '{}', not '{}'",
                assignment.user_id,
                sheet.user_id
            );
        }
        batches.push(AssignmentBatch { assignment, entries });
    }
    Ok(batches)
}
