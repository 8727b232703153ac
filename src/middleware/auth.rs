use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth::{Claims, TokenIssuer};
use crate::error::ApiError;

/// Caller identity extracted from a validated session token
#[derive(Clone, Debug, PartialEq)]
pub struct AuthUser {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl TryFrom<Claims> for AuthUser {
    type Error = ApiError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let id = claims
            .subject_id()
            .ok_or_else(|| ApiError::unauthorized("Invalid JWT token: malformed subject"))?;
        Ok(Self {
            id,
            name: claims.name,
            email: claims.email,
        })
    }
}

/// Rejects requests without a valid bearer token and injects [`AuthUser`].
pub async fn jwt_auth_middleware(
    State(tokens): State<TokenIssuer>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_jwt_from_headers(&headers).map_err(ApiError::unauthorized)?;
    let claims = tokens.validate(&token)?;

    let auth_user = AuthUser::try_from(claims)?;
    tracing::debug!("authenticated student {}", auth_user.id);
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(token.trim().to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}
