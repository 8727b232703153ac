use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::query_builder::UpdatableColumn;

/// Columns selected for every assignment read.
pub const ASSIGNMENT_COLUMNS: &str =
    "id, title, description, due_date, files, created_at, updated_at";

/// Row shape as stored; `files` is still the encoded list.
#[derive(Debug, Clone, FromRow)]
pub struct AssignmentRow {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub files: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: i64,
    pub title: String,
    pub description: String,
    /// `YYYY-MM-DD` shaped; not calendar-checked.
    pub due_date: String,
    pub files: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AssignmentRow> for Assignment {
    fn from(row: AssignmentRow) -> Self {
        let files = decode_files(row.id, &row.files);
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            due_date: row.due_date,
            files,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAssignment {
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub files: Vec<String>,
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssignmentPatch {
    pub id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub files: Option<Vec<String>>,
}

impl AssignmentPatch {
    pub fn has_changes(&self) -> bool {
        self.title.is_some()
            || self.description.is_some()
            || self.due_date.is_some()
            || self.files.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentColumn {
    Title,
    Description,
    DueDate,
    Files,
}

impl UpdatableColumn for AssignmentColumn {
    fn name(&self) -> &'static str {
        match self {
            AssignmentColumn::Title => "title",
            AssignmentColumn::Description => "description",
            AssignmentColumn::DueDate => "due_date",
            AssignmentColumn::Files => "files",
        }
    }
}

/// Encode the file list for storage.
pub(crate) fn encode_files(files: &[String]) -> String {
    serde_json::to_string(files).unwrap_or_else(|_| "[]".to_string())
}

/// Decode the stored file list; unreadable or null values read as empty.
pub(crate) fn decode_files(id: i64, raw: &str) -> Vec<String> {
    if raw.trim().is_empty() || raw.trim() == "null" {
        return Vec::new();
    }
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(files) => files,
        Err(e) => {
            tracing::warn!("assignment {} has unreadable files column: {}", id, e);
            Vec::new()
        }
    }
}
