use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use super::RequestContext;
use crate::database::models::UpdateOutcome;
use crate::error::ApiError;
use crate::filter::{AssignmentSort, Filter};
use crate::handlers::AppState;
use crate::middleware::success_message;
use crate::validation::{parse_assignment_patch, parse_new_assignment};

/// GET ?resource=assignments[&id=ID] - bare object or array
pub async fn get(state: &AppState, ctx: &RequestContext) -> Result<Response, ApiError> {
    match ctx.query_id("id")? {
        Some(id) => {
            let assignment = state
                .assignments
                .get(id)
                .await?
                .ok_or_else(|| ApiError::not_found("Assignment not found"))?;
            Ok(Json(assignment).into_response())
        }
        None => {
            let filter = Filter::<AssignmentSort>::from_params(&ctx.list_params());
            let assignments = state.assignments.list(&filter).await?;
            Ok(Json(assignments).into_response())
        }
    }
}

/// POST ?resource=assignments
pub async fn create(state: &AppState, ctx: &RequestContext) -> Result<Response, ApiError> {
    let input = parse_new_assignment(&ctx.body)?;
    let id = state.assignments.create(&input).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "message": "Assignment created successfully",
            "id": id
        })),
    )
        .into_response())
}

/// PUT ?resource=assignments
pub async fn update(state: &AppState, ctx: &RequestContext) -> Result<Response, ApiError> {
    let patch = parse_assignment_patch(&ctx.body)?;

    let body = match state.assignments.update(&patch).await? {
        UpdateOutcome::Updated => json!({
            "status": "success",
            "message": "Assignment updated successfully"
        }),
        UpdateOutcome::NoChange => json!({
            "status": "no_change",
            "message": "No changes were made"
        }),
    };
    Ok(Json(body).into_response())
}

/// DELETE ?resource=assignments[&id=ID], or id in the body; comments go too
pub async fn delete(state: &AppState, ctx: &RequestContext) -> Result<Response, ApiError> {
    let id = ctx.required_target_id()?;
    state.assignments.delete(id).await?;
    Ok(success_message("Assignment and its comments deleted successfully"))
}
