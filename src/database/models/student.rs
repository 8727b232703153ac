use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::query_builder::UpdatableColumn;

pub const STUDENT_COLUMNS: &str = "id, student_id, name, email, created_at";

/// Public view of a student; the password hash is never part of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Student {
    pub id: i64,
    /// University number supplied at enrolment.
    pub student_id: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct StudentCredentials {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Validated sign-up input; the password is still plaintext here.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentSignup {
    pub student_id: String,
    pub name: String,
    pub email: String,
    pub password: String,
}

/// What the store persists: the password has been hashed.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStudent {
    pub student_id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// How a caller names a student: university number or row id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudentKey {
    StudentId(String),
    Id(i64),
}

impl fmt::Display for StudentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StudentKey::StudentId(sid) => write!(f, "student_id={}", sid),
            StudentKey::Id(id) => write!(f, "id={}", id),
        }
    }
}

/// A validated edit that still has to be resolved to a row.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentEdit {
    pub key: StudentKey,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl StudentEdit {
    pub fn into_patch(self, id: i64) -> StudentPatch {
        StudentPatch {
            id,
            name: self.name,
            email: self.email,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentPatch {
    pub id: i64,
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PasswordChange {
    pub key: StudentKey,
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentColumn {
    Name,
    Email,
}

impl UpdatableColumn for StudentColumn {
    fn name(&self) -> &'static str {
        match self {
            StudentColumn::Name => "name",
            StudentColumn::Email => "email",
        }
    }
}
