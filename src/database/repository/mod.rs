//! Store seams the router talks to, and their Postgres implementations.
//!
//! Each trait is a resource's full set of store operations. Handlers hold
//! them as `Arc<dyn ...>` so the HTTP layer never sees a pool.

pub mod assignments;
pub mod comments;
pub mod students;

use async_trait::async_trait;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    Assignment, AssignmentPatch, Comment, NewAssignment, NewComment, NewStudent, Student,
    StudentCredentials, StudentPatch, UpdateOutcome,
};
use crate::filter::{AssignmentSort, Filter, StudentSort};

pub use assignments::PgAssignmentRepository;
pub use comments::PgCommentRepository;
pub use students::PgStudentRepository;

#[async_trait]
pub trait AssignmentStore: Send + Sync {
    /// Matching assignments in the requested order; empty is not an error.
    async fn list(&self, filter: &Filter<AssignmentSort>) -> Result<Vec<Assignment>, DatabaseError>;

    async fn get(&self, id: i64) -> Result<Option<Assignment>, DatabaseError>;

    /// Insert and return the store-assigned id.
    async fn create(&self, input: &NewAssignment) -> Result<i64, DatabaseError>;

    /// `NotFound` if the row is missing; `NoChange` if every value already matched.
    async fn update(&self, patch: &AssignmentPatch) -> Result<UpdateOutcome, DatabaseError>;

    /// Remove the assignment and all of its comments as one unit.
    async fn delete(&self, id: i64) -> Result<(), DatabaseError>;
}

#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Oldest first.
    async fn list_for_assignment(&self, assignment_id: i64) -> Result<Vec<Comment>, DatabaseError>;

    /// `NotFound` when the parent assignment does not exist.
    async fn create(&self, input: &NewComment) -> Result<Comment, DatabaseError>;

    async fn delete(&self, id: i64) -> Result<(), DatabaseError>;
}

#[async_trait]
pub trait StudentStore: Send + Sync {
    async fn list(&self, filter: &Filter<StudentSort>) -> Result<Vec<Student>, DatabaseError>;

    async fn get(&self, id: i64) -> Result<Option<Student>, DatabaseError>;

    async fn find_by_student_id(&self, student_id: &str) -> Result<Option<Student>, DatabaseError>;

    /// `Conflict` when the university number or the email is already registered.
    async fn create(&self, input: &NewStudent) -> Result<Student, DatabaseError>;

    /// `NotFound` for a missing id, `Conflict` when the new email is taken.
    async fn update(&self, patch: &StudentPatch) -> Result<UpdateOutcome, DatabaseError>;

    async fn delete(&self, id: i64) -> Result<(), DatabaseError>;

    async fn credentials_by_email(&self, email: &str) -> Result<Option<StudentCredentials>, DatabaseError>;

    async fn credentials_by_id(&self, id: i64) -> Result<Option<StudentCredentials>, DatabaseError>;

    async fn set_password_hash(&self, id: i64, password_hash: &str) -> Result<(), DatabaseError>;
}
