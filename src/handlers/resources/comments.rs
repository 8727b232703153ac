use axum::response::{IntoResponse, Response};

use super::RequestContext;
use crate::error::ApiError;
use crate::handlers::AppState;
use crate::middleware::{success_message, ApiResponse};
use crate::validation::{parse_new_comment, ValidationError};

/// GET ?resource=comments&assignment_id=ID - oldest first
pub async fn list(state: &AppState, ctx: &RequestContext) -> Result<Response, ApiError> {
    let assignment_id = ctx.query_id("assignment_id")?.ok_or_else(|| {
        ValidationError::for_field("Missing required fields", "assignment_id", "This field is required")
    })?;

    let comments = state.comments.list_for_assignment(assignment_id).await?;
    Ok(ApiResponse::success(comments).into_response())
}

/// POST ?resource=comments
pub async fn create(state: &AppState, ctx: &RequestContext) -> Result<Response, ApiError> {
    let input = parse_new_comment(&ctx.body)?;
    let comment = state.comments.create(&input).await?;
    Ok(ApiResponse::created(comment).into_response())
}

/// DELETE ?resource=comments&id=ID
pub async fn delete(state: &AppState, ctx: &RequestContext) -> Result<Response, ApiError> {
    let id = ctx
        .query_id("id")?
        .ok_or_else(|| ValidationError::for_field("Missing required fields", "id", "This field is required"))?;

    state.comments.delete(id).await?;
    Ok(success_message("Comment deleted successfully"))
}
