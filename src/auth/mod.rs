//! Login: credential checks behind the [`Authenticator`] seam, and the
//! session tokens handed out once a caller is known.

pub mod password;
pub mod token;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::database::repository::StudentStore;
use crate::database::DatabaseError;

pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenError, TokenIssuer};

/// Who the caller is once credentials check out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub id: i64,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Store(#[from] DatabaseError),

    #[error("password hashing failed: {0}")]
    Hash(String),
}

#[async_trait]
pub trait Authenticator: Send + Sync {
    /// `Ok(None)` for unknown email or wrong password alike.
    async fn authenticate(&self, email: &str, password: &str) -> Result<Option<Identity>, AuthError>;
}

/// Checks credentials against stored Argon2id hashes.
pub struct StoreAuthenticator {
    students: Arc<dyn StudentStore>,
}

impl StoreAuthenticator {
    pub fn new(students: Arc<dyn StudentStore>) -> Self {
        Self { students }
    }
}

#[async_trait]
impl Authenticator for StoreAuthenticator {
    async fn authenticate(&self, email: &str, password: &str) -> Result<Option<Identity>, AuthError> {
        let Some(creds) = self.students.credentials_by_email(email).await? else {
            return Ok(None);
        };
        match verify_password(password, &creds.password_hash) {
            Ok(true) => Ok(Some(Identity {
                id: creds.id,
                name: creds.name,
                email: creds.email,
            })),
            Ok(false) => Ok(None),
            Err(e) => {
                warn!("student {} has an unreadable password hash: {}", creds.id, e);
                Ok(None)
            }
        }
    }
}
