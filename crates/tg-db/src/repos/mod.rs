//! Repository modules.
//!
//! `entry`, `comment`, and `alert` are borrowed-connection adapters that
//! implement the guard's collaborator traits, so they work equally on the
//! plain connection and inside a transaction. `project` and `assignment`
//! are `impl TimesheetDb` blocks.

pub mod alert;
pub mod assignment;
pub mod comment;
pub mod entry;
pub mod project;
