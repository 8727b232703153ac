//! Input validation: presence, format and allow-list checks with no I/O.
//!
//! Request bodies arrive as loose JSON. The functions here turn them into the
//! typed inputs the repositories accept, or a [`ValidationError`] listing every
//! offending field.

pub mod assignments;
pub mod comments;
pub mod students;

use std::collections::HashMap;

use serde_json::{Map, Value};
use thiserror::Error;

pub use assignments::{parse_assignment_patch, parse_new_assignment};
pub use comments::parse_new_comment;
pub use students::{
    parse_login, parse_password_change, parse_student_id, parse_student_patch, parse_student_signup,
    LoginRequest,
};

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_AUTHOR_LEN: usize = 100;
pub const MAX_NAME_LEN: usize = 100;
pub const MAX_STUDENT_ID_LEN: usize = 50;
pub const MAX_EMAIL_LEN: usize = 255;
pub const MIN_PASSWORD_LEN: usize = 8;

const REQUIRED: &str = "This field is required";

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
    pub field_errors: HashMap<String, String>,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field_errors: HashMap::new(),
        }
    }

    pub fn for_field(message: impl Into<String>, field: &str, detail: impl Into<String>) -> Self {
        let mut err = Self::new(message);
        err.field_errors.insert(field.to_string(), detail.into());
        err
    }
}

/// `^\d{4}-\d{2}-\d{2}$`, nothing more: `2024-02-30` passes.
pub fn is_iso_date(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// One `@`, a non-empty local part, and a dotted domain without spaces.
pub fn is_plausible_email(value: &str) -> bool {
    if value.len() > MAX_EMAIL_LEN || value.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = value.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return false,
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..")
}

/// Positive integer id from a JSON number or a numeric string.
pub fn parse_id(value: &Value) -> Option<i64> {
    let id = match value {
        Value::Number(n) => n.as_i64()?,
        Value::String(s) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };
    (id > 0).then_some(id)
}

/// Id from a query parameter; blank means absent.
pub fn parse_id_param(field: &str, raw: Option<&str>) -> Result<Option<i64>, ValidationError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => parse_id(&Value::String(s.to_string()))
            .map(Some)
            .ok_or_else(|| ValidationError::for_field("Invalid identifier", field, "Must be a positive integer")),
    }
}

/// The request body as a JSON object; a missing body reads as empty.
pub fn body_object(body: &Value) -> Result<&Map<String, Value>, ValidationError> {
    static EMPTY: once_cell::sync::Lazy<Map<String, Value>> = once_cell::sync::Lazy::new(Map::new);
    match body {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(&EMPTY),
        _ => Err(ValidationError::new("Request body must be a JSON object")),
    }
}

/// Collects field problems so a caller sees all of them at once.
#[derive(Debug, Default)]
pub(crate) struct Checker {
    errors: HashMap<String, String>,
    missing: bool,
}

impl Checker {
    pub fn new() -> Self {
        Self::default()
    }

    fn fail(&mut self, field: &str, detail: impl Into<String>) {
        self.errors.entry(field.to_string()).or_insert_with(|| detail.into());
    }

    fn present<'a>(body: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
        body.get(field).filter(|v| !v.is_null())
    }

    /// Trimmed non-empty string that must be present.
    pub fn required_text(&mut self, body: &Map<String, Value>, field: &str, max_len: Option<usize>) -> Option<String> {
        if Self::present(body, field).is_none() {
            self.missing = true;
            self.fail(field, REQUIRED);
            return None;
        }
        self.optional_text(body, field, max_len)
    }

    /// Trimmed non-empty string if present; absent and null read as `None`.
    pub fn optional_text(&mut self, body: &Map<String, Value>, field: &str, max_len: Option<usize>) -> Option<String> {
        let value = Self::present(body, field)?;
        let text = match value {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            _ => {
                self.fail(field, "Must be a string");
                return None;
            }
        };
        if text.is_empty() {
            self.fail(field, "Must not be empty");
            return None;
        }
        if let Some(max) = max_len {
            if text.chars().count() > max {
                self.fail(field, format!("Must be at most {} characters", max));
                return None;
            }
        }
        Some(text)
    }

    /// Secret taken verbatim (no trimming) with a minimum length.
    pub fn required_secret(&mut self, body: &Map<String, Value>, field: &str) -> Option<String> {
        match Self::present(body, field) {
            None => {
                self.missing = true;
                self.fail(field, REQUIRED);
                None
            }
            Some(Value::String(s)) if s.chars().count() >= MIN_PASSWORD_LEN => Some(s.clone()),
            Some(Value::String(_)) => {
                self.fail(field, format!("Must be at least {} characters", MIN_PASSWORD_LEN));
                None
            }
            Some(_) => {
                self.fail(field, "Must be a string");
                None
            }
        }
    }

    pub fn required_id(&mut self, body: &Map<String, Value>, field: &str) -> Option<i64> {
        match Self::present(body, field) {
            None => {
                self.missing = true;
                self.fail(field, REQUIRED);
                None
            }
            Some(value) => {
                let id = parse_id(value);
                if id.is_none() {
                    self.fail(field, "Must be a positive integer");
                }
                id
            }
        }
    }

    pub fn date(&mut self, field: &str, value: Option<String>) -> Option<String> {
        let value = value?;
        if is_iso_date(&value) {
            Some(value)
        } else {
            self.fail(field, "Invalid date format, expected YYYY-MM-DD");
            None
        }
    }

    pub fn email(&mut self, field: &str, value: Option<String>) -> Option<String> {
        let value = value?;
        if is_plausible_email(&value) {
            Some(value.to_lowercase())
        } else {
            self.fail(field, "Invalid email format");
            None
        }
    }

    /// Ordered list of string references; absent and null read as `None`.
    pub fn string_list(&mut self, body: &Map<String, Value>, field: &str) -> Option<Vec<String>> {
        match Self::present(body, field)? {
            Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::String(s) => out.push(s.clone()),
                        _ => {
                            self.fail(field, "Must be an array of strings");
                            return None;
                        }
                    }
                }
                Some(out)
            }
            _ => {
                self.fail(field, "Must be an array of strings");
                None
            }
        }
    }

    pub fn finish(self) -> Result<(), ValidationError> {
        if self.errors.is_empty() {
            return Ok(());
        }
        let message = if self.missing {
            "Missing required fields"
        } else {
            "Invalid field format"
        };
        Err(ValidationError {
            message: message.to_string(),
            field_errors: self.errors,
        })
    }
}
