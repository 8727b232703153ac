// handlers/mod.rs - two tiers
//
// Public (no auth): /health, /auth/login
// Resources: the method + `?resource=` router at `/`, optionally behind JWT auth
pub mod public;
pub mod resources;

use std::sync::Arc;

use crate::auth::{Authenticator, StoreAuthenticator, TokenIssuer};
use crate::config::AppConfig;
use crate::database::repository::{
    AssignmentStore, CommentStore, PgAssignmentRepository, PgCommentRepository,
    PgStudentRepository, StudentStore,
};
use crate::database::DatabaseManager;

pub use resources::{dispatch, RequestContext};

/// Everything a handler may touch; cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub database: DatabaseManager,
    pub assignments: Arc<dyn AssignmentStore>,
    pub comments: Arc<dyn CommentStore>,
    pub students: Arc<dyn StudentStore>,
    pub authenticator: Arc<dyn Authenticator>,
    pub tokens: TokenIssuer,
}

impl AppState {
    /// Wire the Postgres stores over one pool.
    pub fn postgres(database: DatabaseManager, config: &AppConfig) -> Self {
        let students: Arc<dyn StudentStore> = Arc::new(PgStudentRepository::new(database.clone()));
        Self {
            assignments: Arc::new(PgAssignmentRepository::new(database.clone())),
            comments: Arc::new(PgCommentRepository::new(database.clone())),
            authenticator: Arc::new(StoreAuthenticator::new(students.clone())),
            students,
            tokens: TokenIssuer::from_config(&config.security),
            database,
        }
    }
}
