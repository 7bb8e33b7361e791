use serde::Serialize;
use tg_core::status::AssignmentStatus;
use tg_db::oracle::SqlStatusOracle;
use tg_guard::StatusOracle;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::StatusArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct StatusResponse {
    assignment_id: i64,
    #[serde(flatten)]
    status: AssignmentStatus,
}

/// Handle `tg status`.
pub async fn handle(args: &StatusArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let assignment = ctx.db.get_assignment(args.assignment).await?;
    let oracle = SqlStatusOracle::new(ctx.db.conn(), ctx.policy());
    let status = oracle.status_of(&assignment).await?;
    output(
        &StatusResponse {
            assignment_id: assignment.id,
            status,
        },
        flags.format,
    )
}
