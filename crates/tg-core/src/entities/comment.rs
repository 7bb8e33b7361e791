use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Free-text annotation for one user's week of bookings.
///
/// Identity is `(user_id, week_start)`; persisting the same identity again
/// replaces the text.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Comment {
    pub user_id: String,
    pub week_start: NaiveDate,
    pub text: String,
}
