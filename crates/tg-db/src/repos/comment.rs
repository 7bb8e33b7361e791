//! Weekly comment repository.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tg_core::entities::Comment;
use tg_guard::CommentStore;

use crate::error::DatabaseError;
use crate::helpers::{date_param, parse_date};

pub struct CommentRepo<'a> {
    conn: &'a libsql::Connection,
}

impl<'a> CommentRepo<'a> {
    #[must_use]
    pub const fn new(conn: &'a libsql::Connection) -> Self {
        Self { conn }
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or the row is malformed.
    pub async fn get(
        &self,
        user_id: &str,
        week_start: NaiveDate,
    ) -> Result<Option<Comment>, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                "SELECT user_id, week_start, comment FROM timesheet_comments
                 WHERE user_id = ?1 AND week_start = ?2",
                libsql::params![user_id, date_param(week_start)],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(Comment {
                user_id: row.get(0)?,
                week_start: parse_date(&row.get::<String>(1)?)?,
                text: row.get(2)?,
            })),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl CommentStore for CommentRepo<'_> {
    async fn persist_comment(&self, comment: &Comment) -> anyhow::Result<()> {
        self.conn
            .execute(
                "INSERT INTO timesheet_comments (user_id, week_start, comment, updated_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT (user_id, week_start)
                 DO UPDATE SET comment = excluded.comment, updated_at = excluded.updated_at",
                libsql::params![
                    comment.user_id.as_str(),
                    date_param(comment.week_start),
                    comment.text.as_str(),
                    Utc::now().to_rfc3339()
                ],
            )
            .await?;
        Ok(())
    }
}
