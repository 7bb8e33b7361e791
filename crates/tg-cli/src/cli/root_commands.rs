use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::cli::subcommands::{AssignmentCommands, ProjectCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Create or migrate the database.
    Init,
    /// Projects and their managers.
    Project {
        #[command(subcommand)]
        action: ProjectCommands,
    },
    /// Budgeted assignments of users on projects.
    Assignment {
        #[command(subcommand)]
        action: AssignmentCommands,
    },
    /// Book a weekly timesheet from a JSON file.
    Book(BookArgs),
    /// Show the budget status of an assignment.
    Status(StatusArgs),
    /// List queued manager alerts.
    Alerts(AlertsArgs),
    /// Print the JSON schema of the weekly timesheet file.
    Schema,
}

#[derive(Clone, Debug, Args)]
pub struct BookArgs {
    /// Path to the weekly sheet (see `tg schema`).
    #[arg(long)]
    pub file: PathBuf,
}

#[derive(Clone, Debug, Args)]
pub struct StatusArgs {
    #[arg(long)]
    pub assignment: i64,
}

#[derive(Clone, Debug, Args)]
pub struct AlertsArgs {
    /// Only alerts for this assignment.
    #[arg(long)]
    pub assignment: Option<i64>,
}
