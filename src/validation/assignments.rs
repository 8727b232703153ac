use serde_json::Value;

use super::{body_object, Checker, ValidationError, MAX_TITLE_LEN};
use crate::database::models::{AssignmentPatch, NewAssignment};

pub const NOTHING_TO_UPDATE: &str = "Nothing to update";

pub fn parse_new_assignment(body: &Value) -> Result<NewAssignment, ValidationError> {
    let body = body_object(body)?;
    let mut check = Checker::new();

    let title = check.required_text(body, "title", Some(MAX_TITLE_LEN));
    let description = check.required_text(body, "description", None);
    let due_date = check.required_text(body, "due_date", None);
    let due_date = check.date("due_date", due_date);
    let files = check.string_list(body, "files").unwrap_or_default();

    check.finish()?;

    match (title, description, due_date) {
        (Some(title), Some(description), Some(due_date)) => Ok(NewAssignment {
            title,
            description,
            due_date,
            files,
        }),
        _ => Err(ValidationError::new("Missing required fields")),
    }
}

/// Only keys present (and not null) become part of the patch.
pub fn parse_assignment_patch(body: &Value) -> Result<AssignmentPatch, ValidationError> {
    let body = body_object(body)?;
    let mut check = Checker::new();

    let id = check.required_id(body, "id");
    let title = check.optional_text(body, "title", Some(MAX_TITLE_LEN));
    let description = check.optional_text(body, "description", None);
    let due_date = check.optional_text(body, "due_date", None);
    let due_date = check.date("due_date", due_date);
    let files = check.string_list(body, "files");

    check.finish()?;

    let id = id.ok_or_else(|| ValidationError::for_field("Missing required fields", "id", "This field is required"))?;
    let patch = AssignmentPatch {
        id,
        title,
        description,
        due_date,
        files,
    };
    if !patch.has_changes() {
        return Err(ValidationError::new(NOTHING_TO_UPDATE));
    }
    Ok(patch)
}
