use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const COMMENT_COLUMNS: &str = "id, assignment_id, author, content, created_at";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: i64,
    pub assignment_id: i64,
    pub author: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewComment {
    pub assignment_id: i64,
    pub author: String,
    pub content: String,
}
