use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Case-insensitive `asc` / `desc`; anything else is rejected.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }

    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// A column a listing may be ordered by.
///
/// Implementors are closed enums: the only way to reach SQL text is through
/// `column()`, which returns a compile-time constant.
pub trait SortColumn: Copy + Default + PartialEq + std::fmt::Debug {
    fn parse(raw: &str) -> Option<Self>;
    fn column(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AssignmentSort {
    #[default]
    Id,
    Title,
    DueDate,
    CreatedAt,
}

impl SortColumn for AssignmentSort {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "id" => Some(AssignmentSort::Id),
            "title" => Some(AssignmentSort::Title),
            "due_date" => Some(AssignmentSort::DueDate),
            "created_at" => Some(AssignmentSort::CreatedAt),
            _ => None,
        }
    }

    fn column(&self) -> &'static str {
        match self {
            AssignmentSort::Id => "id",
            AssignmentSort::Title => "title",
            AssignmentSort::DueDate => "due_date",
            AssignmentSort::CreatedAt => "created_at",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StudentSort {
    Id,
    #[default]
    Name,
    StudentId,
    Email,
}

impl SortColumn for StudentSort {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "id" => Some(StudentSort::Id),
            "name" => Some(StudentSort::Name),
            "student_id" => Some(StudentSort::StudentId),
            "email" => Some(StudentSort::Email),
            _ => None,
        }
    }

    fn column(&self) -> &'static str {
        match self {
            StudentSort::Id => "id",
            StudentSort::Name => "name",
            StudentSort::StudentId => "student_id",
            StudentSort::Email => "email",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FilterOrderInfo<S: SortColumn> {
    pub column: S,
    pub sort: SortDirection,
}

/// Raw listing parameters as they arrive on the query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<serde_json::Value>,
}
