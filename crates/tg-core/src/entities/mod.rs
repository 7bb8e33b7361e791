//! Entity structs for the Timeguard domain.
//!
//! Each entity maps to a table in the libSQL database (see `tg-db` migrations).
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema`.

mod assignment;
mod comment;
mod entry;

pub use assignment::{Assignment, Manager, Project};
pub use comment::Comment;
pub use entry::Entry;
