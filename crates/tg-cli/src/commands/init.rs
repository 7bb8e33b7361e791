use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct InitResponse<'a> {
    database: &'a str,
    migrated: bool,
}

/// Handle `tg init`. Opening the context already ran the migrations.
pub fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    tracing::info!(database = %ctx.config.database.path, "database ready");
    output(
        &InitResponse {
            database: &ctx.config.database.path,
            migrated: true,
        },
        flags.format,
    )
}
