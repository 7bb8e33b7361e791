use tg_db::repos::alert::AlertOutbox;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::AlertsArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `tg alerts`.
pub async fn handle(args: &AlertsArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let alerts = AlertOutbox::new(ctx.db.conn()).list(args.assignment).await?;
    output(&alerts, flags.format)
}
