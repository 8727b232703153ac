use serde_json::Value;

use super::{body_object, Checker, ValidationError, MAX_AUTHOR_LEN};
use crate::database::models::NewComment;

/// The body carries the comment as `text`; it is stored as `content`.
pub fn parse_new_comment(body: &Value) -> Result<NewComment, ValidationError> {
    let body = body_object(body)?;
    let mut check = Checker::new();

    let assignment_id = check.required_id(body, "assignment_id");
    let author = check.required_text(body, "author", Some(MAX_AUTHOR_LEN));
    let content = check.required_text(body, "text", None);

    check.finish()?;

    match (assignment_id, author, content) {
        (Some(assignment_id), Some(author), Some(content)) => Ok(NewComment {
            assignment_id,
            author,
            content,
        }),
        _ => Err(ValidationError::new("Missing required fields")),
    }
}
