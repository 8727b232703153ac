use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use super::RequestContext;
use crate::auth::{hash_password, verify_password, AuthError};
use crate::database::models::{NewStudent, Student, StudentKey, UpdateOutcome};
use crate::error::ApiError;
use crate::filter::{Filter, StudentSort};
use crate::handlers::AppState;
use crate::middleware::{success_message, ApiResponse};
use crate::validation::{
    parse_password_change, parse_student_id, parse_student_patch, parse_student_signup, ValidationError,
    MAX_STUDENT_ID_LEN,
};

fn hash(password: &str) -> Result<String, AuthError> {
    hash_password(password).map_err(|e| AuthError::Hash(e.to_string()))
}

/// `student_id` from the query, then from the body, then the row id.
fn request_key(ctx: &RequestContext) -> Result<Option<StudentKey>, ValidationError> {
    if let Some(raw) = ctx.query_param("student_id").filter(|s| !s.trim().is_empty()) {
        return parse_student_id(&serde_json::Value::String(raw.to_string()))
            .map(|sid| Some(StudentKey::StudentId(sid)))
            .ok_or_else(|| {
                ValidationError::for_field(
                    "Invalid identifier",
                    "student_id",
                    format!("Must be at most {} characters", MAX_STUDENT_ID_LEN),
                )
            });
    }
    if let Some(value) = ctx.body.get("student_id").filter(|v| !v.is_null()) {
        return parse_student_id(value)
            .map(|sid| Some(StudentKey::StudentId(sid)))
            .ok_or_else(|| {
                ValidationError::for_field("Invalid identifier", "student_id", "Must be a non-empty string")
            });
    }
    Ok(ctx.target_id()?.map(StudentKey::Id))
}

async fn lookup(state: &AppState, key: &StudentKey) -> Result<Student, ApiError> {
    let found = match key {
        StudentKey::StudentId(sid) => state.students.find_by_student_id(sid).await?,
        StudentKey::Id(id) => state.students.get(*id).await?,
    };
    found.ok_or_else(|| ApiError::not_found("Student not found"))
}

/// GET ?resource=students[&student_id=SID | &id=ID]
pub async fn get(state: &AppState, ctx: &RequestContext) -> Result<Response, ApiError> {
    match request_key(ctx)? {
        Some(key) => {
            let student = lookup(state, &key).await?;
            Ok(ApiResponse::success(student).into_response())
        }
        None => {
            let filter = Filter::<StudentSort>::from_params(&ctx.list_params());
            let students = state.students.list(&filter).await?;
            Ok(ApiResponse::success(students).into_response())
        }
    }
}

/// POST ?resource=students
pub async fn create(state: &AppState, ctx: &RequestContext) -> Result<Response, ApiError> {
    let signup = parse_student_signup(&ctx.body)?;
    let new_student = NewStudent {
        student_id: signup.student_id,
        password_hash: hash(&signup.password)?,
        name: signup.name,
        email: signup.email,
    };

    let student = state.students.create(&new_student).await?;
    Ok(ApiResponse::created(student).into_response())
}

/// PUT ?resource=students
pub async fn update(state: &AppState, ctx: &RequestContext) -> Result<Response, ApiError> {
    let edit = parse_student_patch(&ctx.body)?;
    let id = lookup(state, &edit.key).await?.id;

    let body = match state.students.update(&edit.into_patch(id)).await? {
        UpdateOutcome::Updated => json!({
            "success": true,
            "status": "success",
            "message": "Student updated successfully"
        }),
        UpdateOutcome::NoChange => json!({
            "success": true,
            "status": "no_change",
            "message": "No changes were made"
        }),
    };
    Ok(Json(body).into_response())
}

/// POST ?resource=students&action=change_password
pub async fn change_password(state: &AppState, ctx: &RequestContext) -> Result<Response, ApiError> {
    let change = parse_password_change(&ctx.body)?;
    let id = lookup(state, &change.key).await?.id;

    let creds = state
        .students
        .credentials_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Student not found"))?;

    let matches = verify_password(&change.current_password, &creds.password_hash).unwrap_or_else(|e| {
        tracing::warn!("student {} has an unreadable password hash: {}", creds.id, e);
        false
    });
    if !matches {
        return Err(ApiError::unauthorized("Current password is incorrect"));
    }

    state
        .students
        .set_password_hash(id, &hash(&change.new_password)?)
        .await?;
    tracing::info!("student {} changed password", change.key);
    Ok(success_message("Password updated successfully"))
}

/// DELETE ?resource=students[&student_id=SID | &id=ID], or either key in the body
pub async fn delete(state: &AppState, ctx: &RequestContext) -> Result<Response, ApiError> {
    let key = request_key(ctx)?.ok_or_else(|| {
        ValidationError::for_field("Missing required fields", "student_id", "This field is required")
    })?;
    let id = lookup(state, &key).await?.id;
    state.students.delete(id).await?;
    Ok(success_message("Student deleted successfully"))
}
