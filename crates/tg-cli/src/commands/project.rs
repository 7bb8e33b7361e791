use tg_core::entities::Manager;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ProjectCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `tg project`.
pub async fn handle(
    action: &ProjectCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        ProjectCommands::Add {
            name,
            manager_name,
            manager_email,
        } => {
            let manager = match (manager_name, manager_email) {
                (Some(name), Some(email)) => Some(Manager {
                    name: name.clone(),
                    email: email.clone(),
                }),
                _ => None,
            };
            let project = ctx.db.create_project(name, manager.as_ref()).await?;
            output(&project, flags.format)
        }
        ProjectCommands::Get { id } => output(&ctx.db.get_project(*id).await?, flags.format),
    }
}
