pub mod assignment;
pub mod comment;
pub mod student;

pub use assignment::{Assignment, AssignmentPatch, NewAssignment};
pub use comment::{Comment, NewComment};
pub use student::{
    NewStudent, PasswordChange, Student, StudentCredentials, StudentEdit, StudentKey, StudentPatch,
    StudentSignup,
};

/// Result of a conditional update that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    /// The row exists but every supplied value matched what was stored.
    NoChange,
}
