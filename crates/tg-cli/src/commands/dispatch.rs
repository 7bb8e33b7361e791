use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Init => commands::init::handle(ctx, flags),
        Commands::Project { action } => commands::project::handle(&action, ctx, flags).await,
        Commands::Assignment { action } => commands::assignment::handle(&action, ctx, flags).await,
        Commands::Book(args) => commands::book::handle(&args, ctx, flags).await,
        Commands::Status(args) => commands::status::handle(&args, ctx, flags).await,
        Commands::Alerts(args) => commands::alerts::handle(&args, ctx, flags).await,
        Commands::Schema => commands::schema::handle(flags),
    }
}
