use async_trait::async_trait;
use tracing::debug;

use super::CommentStore;
use crate::database::manager::{expect_single_row, DatabaseError, DatabaseManager};
use crate::database::models::comment::COMMENT_COLUMNS;
use crate::database::models::{Comment, NewComment};

pub struct PgCommentRepository {
    db: DatabaseManager,
}

impl PgCommentRepository {
    pub fn new(db: DatabaseManager) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CommentStore for PgCommentRepository {
    async fn list_for_assignment(&self, assignment_id: i64) -> Result<Vec<Comment>, DatabaseError> {
        let query = format!(
            "SELECT {} FROM comments WHERE assignment_id = $1 ORDER BY created_at ASC, id ASC",
            COMMENT_COLUMNS
        );
        let comments = sqlx::query_as::<_, Comment>(&query)
            .bind(assignment_id)
            .fetch_all(self.db.pool())
            .await?;
        Ok(comments)
    }

    async fn create(&self, input: &NewComment) -> Result<Comment, DatabaseError> {
        // Best effort: a parent deleted between this check and the insert is
        // caught by the foreign key and reported the same way.
        let parent: Option<i64> = sqlx::query_scalar("SELECT id FROM assignments WHERE id = $1")
            .bind(input.assignment_id)
            .fetch_optional(self.db.pool())
            .await?;
        if parent.is_none() {
            return Err(DatabaseError::NotFound("Assignment not found".to_string()));
        }

        let query = format!(
            "INSERT INTO comments (assignment_id, author, content, created_at)
             VALUES ($1, $2, $3, NOW())
             RETURNING {}",
            COMMENT_COLUMNS
        );
        let comment = sqlx::query_as::<_, Comment>(&query)
            .bind(input.assignment_id)
            .bind(&input.author)
            .bind(&input.content)
            .fetch_one(self.db.pool())
            .await
            .map_err(|e| DatabaseError::not_found_on_foreign_key(e, "Assignment not found"))?;

        debug!("created comment {} on assignment {}", comment.id, comment.assignment_id);
        Ok(comment)
    }

    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM comments WHERE id = $1")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;
        if found.is_none() {
            return Err(DatabaseError::NotFound("Comment not found".to_string()));
        }

        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(self.db.pool())
            .await?;
        expect_single_row(result.rows_affected(), "Comment")
    }
}
