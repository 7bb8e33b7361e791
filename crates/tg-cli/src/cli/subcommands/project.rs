use clap::Subcommand;

/// Project commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ProjectCommands {
    /// Create a project.
    Add {
        #[arg(long)]
        name: String,
        /// Manager alerted on budget crossings (requires --manager-email).
        #[arg(long, requires = "manager_email")]
        manager_name: Option<String>,
        #[arg(long, requires = "manager_name")]
        manager_email: Option<String>,
    },
    /// Get a project by ID.
    Get { id: i64 },
}
