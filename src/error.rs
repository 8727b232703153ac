// HTTP API Error Types
use axum::{
    extract::rejection::{BytesRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::auth::{AuthError, TokenError};
use crate::database::DatabaseError;
use crate::validation::ValidationError;

const GENERIC_FAILURE: &str = "An error occurred while processing your request";

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    ValidationError {
        message: String,
        field_errors: Option<HashMap<String, String>>,
    },
    InvalidJson(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 404 Not Found
    NotFound(String),

    // 405 Method Not Allowed
    MethodNotAllowed(String),

    // 409 Conflict
    Conflict(String),

    // 413 Payload Too Large
    PayloadTooLarge(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::ValidationError { .. } => 400,
            ApiError::InvalidJson(_) => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::NotFound(_) => 404,
            ApiError::MethodNotAllowed(_) => 405,
            ApiError::Conflict(_) => 409,
            ApiError::PayloadTooLarge(_) => 413,
            ApiError::InternalServerError(_) => 500,
            ApiError::ServiceUnavailable(_) => 503,
        }
    }

    /// Client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::ValidationError { message, .. } => message,
            ApiError::InvalidJson(msg) => msg,
            ApiError::Unauthorized(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::MethodNotAllowed(msg) => msg,
            ApiError::Conflict(msg) => msg,
            ApiError::PayloadTooLarge(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
            ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    pub fn to_json(&self) -> Value {
        let mut body = json!({
            "success": false,
            "error": self.message(),
            "code": self.error_code()
        });
        if let ApiError::ValidationError {
            field_errors: Some(field_errors),
            ..
        } = self
        {
            if !field_errors.is_empty() {
                body["field_errors"] = json!(field_errors);
            }
        }
        body
    }

    /// Error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::ValidationError { .. } => "VALIDATION_ERROR",
            ApiError::InvalidJson(_) => "INVALID_JSON",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::MethodNotAllowed(_) => "METHOD_NOT_ALLOWED",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn validation_error(
        message: impl Into<String>,
        field_errors: Option<HashMap<String, String>>,
    ) -> Self {
        ApiError::ValidationError {
            message: message.into(),
            field_errors,
        }
    }

    pub fn invalid_json(message: impl Into<String>) -> Self {
        ApiError::InvalidJson(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn method_not_allowed(message: impl Into<String>) -> Self {
        ApiError::MethodNotAllowed(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        ApiError::PayloadTooLarge(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        let field_errors = (!err.field_errors.is_empty()).then_some(err.field_errors);
        ApiError::validation_error(err.message, field_errors)
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::payload_too_large("Request body is too large")
        } else {
            tracing::debug!("unreadable request body: {}", rejection.body_text());
            ApiError::bad_request("Unable to read request body")
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!("rejected query string: {}", rejection.body_text());
        ApiError::bad_request("Invalid query string")
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(msg) => ApiError::not_found(msg),
            DatabaseError::Conflict(msg) => ApiError::conflict(msg),
            DatabaseError::PartialFailure(msg) => {
                tracing::error!("Partial failure: {}", msg);
                ApiError::internal_server_error(GENERIC_FAILURE)
            }
            DatabaseError::Sqlx(sqlx_err) => {
                // Log the real error but return generic message
                tracing::error!("SQLx error: {}", sqlx_err);
                ApiError::internal_server_error(GENERIC_FAILURE)
            }
            DatabaseError::ConfigMissing(_) | DatabaseError::InvalidDatabaseUrl => {
                tracing::error!("Database misconfigured: {}", err);
                ApiError::service_unavailable("Database temporarily unavailable")
            }
            DatabaseError::MigrationError(msg) => {
                tracing::error!("Migration error: {}", msg);
                ApiError::service_unavailable("Service is being updated, please try again later")
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Store(db) => db.into(),
            AuthError::Hash(msg) => {
                tracing::error!("Password hashing error: {}", msg);
                ApiError::internal_server_error(GENERIC_FAILURE)
            }
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid(msg) => ApiError::unauthorized(format!("Invalid JWT token: {}", msg)),
            TokenError::MissingSecret | TokenError::Encode(_) => {
                tracing::error!("Token error: {}", err);
                ApiError::internal_server_error("Unable to issue session token")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_carries_field_errors() {
        let err: ApiError = ValidationError::for_field("Invalid field format", "due_date", "bad").into();
        assert_eq!(err.status_code(), 400);
        let body = err.to_json();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Invalid field format");
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["field_errors"]["due_date"], "bad");
    }

    #[test]
    fn store_failures_do_not_leak_detail() {
        let err: ApiError = DatabaseError::Sqlx(sqlx::Error::RowNotFound).into();
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.message(), GENERIC_FAILURE);

        let err: ApiError = DatabaseError::PartialFailure("assignment 3 kept".into()).into();
        assert_eq!(err.status_code(), 500);
        assert!(!err.message().contains("assignment 3"));
    }

    #[test]
    fn store_outcomes_map_to_status() {
        let err: ApiError = DatabaseError::NotFound("Assignment not found".into()).into();
        assert_eq!(err.status_code(), 404);
        let err: ApiError = DatabaseError::Conflict("Email is already registered".into()).into();
        assert_eq!(err.status_code(), 409);
        assert!(err.to_json().get("field_errors").is_none());
    }

    #[test]
    fn oversized_body_is_a_json_413() {
        let err = ApiError::payload_too_large("Request body is too large");
        assert_eq!(err.status_code(), 413);
        let body = err.to_json();
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "PAYLOAD_TOO_LARGE");
    }
}
