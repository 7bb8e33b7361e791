use tg_core::enums::BudgetKind;
use tg_db::repos::assignment::NewAssignment;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::{AssignmentAddArgs, AssignmentCommands};
use crate::commands::shared::parse_enum;
use crate::context::AppContext;
use crate::output::output;

/// Handle `tg assignment`.
pub async fn handle(
    action: &AssignmentCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        AssignmentCommands::Add(args) => {
            let new = new_assignment(args)?;
            let assignment = ctx.db.create_assignment(&new).await?;
            output(&assignment, flags.format)
        }
        AssignmentCommands::List { user } => {
            output(&ctx.db.list_assignments(user).await?, flags.format)
        }
        AssignmentCommands::Get { id } => output(&ctx.db.get_assignment(*id).await?, flags.format),
    }
}

fn new_assignment(args: &AssignmentAddArgs) -> anyhow::Result<NewAssignment> {
    let kind: BudgetKind = parse_enum(&args.kind, "kind")?;
    if args.allotted < 0.0 || args.overrun < 0.0 {
        anyhow::bail!("allotted and overrun hours must not be negative");
    }
    if kind == BudgetKind::Fixed && args.overrun > 0.0 {
        tracing::warn!(
            overrun = args.overrun,
            "overrun hours are ignored for fixed assignments"
        );
    }
    Ok(NewAssignment {
        user_id: args.user.clone(),
        project_id: args.project,
        kind,
        allotted_hours: args.allotted,
        allowed_overrun_hours: args.overrun,
        notify_pm: args.notify,
        date_start: args.start,
        date_end: args.end,
    })
}
