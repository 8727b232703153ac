use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::handlers::AppState;
use crate::validation::parse_login;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// POST /auth/login - verify credentials and hand out a session token
pub async fn login(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let body: Value = serde_json::from_slice(&body?).map_err(|_| ApiError::invalid_json("Invalid JSON body"))?;
    let request = parse_login(&body)?;

    let identity = match state.authenticator.authenticate(&request.email, &request.password).await? {
        Some(identity) => identity,
        None => {
            tracing::debug!("failed login for {}", request.email);
            return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
        }
    };

    let token = state.tokens.issue(&identity)?;
    tracing::info!("student {} logged in", identity.id);

    Ok(Json(json!({
        "success": true,
        "message": "Login successful",
        "user": identity,
        "token": token
    })))
}
