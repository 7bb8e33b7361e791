mod assignment;
mod project;

pub use assignment::{AssignmentAddArgs, AssignmentCommands};
pub use project::ProjectCommands;
