use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Identity;
use crate::config::SecurityConfig;

/// Longest session a token may grant (a leap year).
pub const MAX_EXPIRY_HOURS: u64 = 24 * 366;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Student id.
    pub sub: String,
    pub name: String,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn subject_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("JWT secret not configured")]
    MissingSecret,

    #[error("JWT generation error: {0}")]
    Encode(String),

    #[error("Invalid JWT token: {0}")]
    Invalid(String),
}

/// Signs and checks HS256 session tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    secret: String,
    expiry_hours: u64,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("secret", &"***")
            .field("expiry_hours", &self.expiry_hours)
            .finish()
    }
}

impl TokenIssuer {
    /// Expiry is clamped to [`MAX_EXPIRY_HOURS`].
    pub fn new(secret: impl Into<String>, expiry_hours: u64) -> Self {
        if expiry_hours > MAX_EXPIRY_HOURS {
            tracing::warn!(
                "JWT expiry of {} hours exceeds the maximum, using {}",
                expiry_hours,
                MAX_EXPIRY_HOURS
            );
        }
        Self {
            secret: secret.into(),
            expiry_hours: expiry_hours.min(MAX_EXPIRY_HOURS),
        }
    }

    pub fn from_config(security: &SecurityConfig) -> Self {
        Self::new(security.jwt_secret.clone(), security.jwt_expiry_hours)
    }

    pub fn issue(&self, identity: &Identity) -> Result<String, TokenError> {
        if self.secret.is_empty() {
            return Err(TokenError::MissingSecret);
        }
        let now = Utc::now();
        let claims = Claims {
            sub: identity.id.to_string(),
            name: identity.name.clone(),
            email: identity.email.clone(),
            exp: (now + Duration::hours(self.expiry_hours as i64)).timestamp(),
            iat: now.timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| TokenError::Encode(e.to_string()))
    }

    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        if self.secret.is_empty() {
            return Err(TokenError::MissingSecret);
        }
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| TokenError::Invalid(e.to_string()))?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> Identity {
        Identity {
            id: 7,
            name: "Sam Lee".to_string(),
            email: "sam@example.edu".to_string(),
        }
    }

    #[test]
    fn issued_token_validates() {
        let issuer = TokenIssuer::new("test-secret", 1);
        let token = issuer.issue(&identity()).unwrap();
        let claims = issuer.validate(&token).unwrap();
        assert_eq!(claims.subject_id(), Some(7));
        assert_eq!(claims.email, "sam@example.edu");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn other_secret_rejects() {
        let token = TokenIssuer::new("one", 1).issue(&identity()).unwrap();
        assert!(matches!(
            TokenIssuer::new("two", 1).validate(&token),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn huge_expiry_is_clamped() {
        let issuer = TokenIssuer::new("test-secret", u64::MAX);
        let token = issuer.issue(&identity()).unwrap();
        let claims = issuer.validate(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, (MAX_EXPIRY_HOURS * 3600) as i64);
    }

    #[test]
    fn empty_secret_cannot_issue() {
        assert!(matches!(
            TokenIssuer::new("", 1).issue(&identity()),
            Err(TokenError::MissingSecret)
        ));
    }
}
