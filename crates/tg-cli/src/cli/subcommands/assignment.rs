use chrono::NaiveDate;
use clap::{Args, Subcommand};

/// Assignment commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AssignmentCommands {
    /// Create an assignment.
    Add(AssignmentAddArgs),
    /// List the assignments of a user.
    List {
        #[arg(long)]
        user: String,
    },
    /// Get an assignment by ID.
    Get { id: i64 },
}

#[derive(Clone, Debug, Args)]
pub struct AssignmentAddArgs {
    #[arg(long)]
    pub user: String,
    /// Project ID.
    #[arg(long)]
    pub project: i64,
    /// Budget kind: fixed, flex
    #[arg(long)]
    pub kind: String,
    /// Allotted hours.
    #[arg(long)]
    pub allotted: f64,
    /// Allowed overrun hours (flex only).
    #[arg(long, default_value_t = 0.0)]
    pub overrun: f64,
    /// Alert the project manager on budget crossings.
    #[arg(long)]
    pub notify: bool,
    /// First bookable date (YYYY-MM-DD).
    #[arg(long)]
    pub start: Option<NaiveDate>,
    /// Last bookable date (YYYY-MM-DD).
    #[arg(long)]
    pub end: Option<NaiveDate>,
}
