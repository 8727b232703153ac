use serde_json::{Map, Value};

use super::{body_object, Checker, ValidationError, MAX_NAME_LEN, MAX_STUDENT_ID_LEN};
use crate::database::models::{PasswordChange, StudentEdit, StudentKey, StudentSignup};

/// Login input after shape checks; the password is untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// University number from a JSON string or number; blank reads as `None`.
pub fn parse_student_id(value: &Value) -> Option<String> {
    let sid = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!sid.is_empty() && sid.chars().count() <= MAX_STUDENT_ID_LEN).then_some(sid)
}

/// `student_id` wins over `id`; one of them must be there.
fn student_key(check: &mut Checker, body: &Map<String, Value>) -> Option<StudentKey> {
    let present = |field: &str| body.get(field).is_some_and(|v| !v.is_null());
    if present("student_id") {
        check
            .optional_text(body, "student_id", Some(MAX_STUDENT_ID_LEN))
            .map(StudentKey::StudentId)
    } else if present("id") {
        check.required_id(body, "id").map(StudentKey::Id)
    } else {
        check.required_text(body, "student_id", None);
        None
    }
}

pub fn parse_student_signup(body: &Value) -> Result<StudentSignup, ValidationError> {
    let body = body_object(body)?;
    let mut check = Checker::new();

    let student_id = check.required_text(body, "student_id", Some(MAX_STUDENT_ID_LEN));
    let name = check.required_text(body, "name", Some(MAX_NAME_LEN));
    let email = check.required_text(body, "email", None);
    let email = check.email("email", email);
    let password = check.required_secret(body, "password");

    check.finish()?;

    match (student_id, name, email, password) {
        (Some(student_id), Some(name), Some(email), Some(password)) => Ok(StudentSignup {
            student_id,
            name,
            email,
            password,
        }),
        _ => Err(ValidationError::new("Missing required fields")),
    }
}

pub fn parse_student_patch(body: &Value) -> Result<StudentEdit, ValidationError> {
    let body = body_object(body)?;
    let mut check = Checker::new();

    let key = student_key(&mut check, body);
    let name = check.optional_text(body, "name", Some(MAX_NAME_LEN));
    let email = check.optional_text(body, "email", None);
    let email = check.email("email", email);

    check.finish()?;

    let key = key.ok_or_else(|| {
        ValidationError::for_field("Missing required fields", "student_id", "This field is required")
    })?;
    if name.is_none() && email.is_none() {
        return Err(ValidationError::new(super::assignments::NOTHING_TO_UPDATE));
    }
    Ok(StudentEdit { key, name, email })
}

pub fn parse_password_change(body: &Value) -> Result<PasswordChange, ValidationError> {
    let body = body_object(body)?;
    let mut check = Checker::new();

    let key = student_key(&mut check, body);
    let current_password = check.required_secret(body, "current_password");
    let new_password = check.required_secret(body, "new_password");

    check.finish()?;

    match (key, current_password, new_password) {
        (Some(key), Some(current_password), Some(new_password)) => Ok(PasswordChange {
            key,
            current_password,
            new_password,
        }),
        _ => Err(ValidationError::new("Missing required fields")),
    }
}

/// Shape checks only; a wrong password is the authenticator's call.
pub fn parse_login(body: &Value) -> Result<LoginRequest, ValidationError> {
    let body = body_object(body)?;
    let mut check = Checker::new();

    let email = check.required_text(body, "email", None);
    let email = check.email("email", email);
    let password = check.required_secret(body, "password");

    check.finish()?;

    match (email, password) {
        (Some(email), Some(password)) => Ok(LoginRequest { email, password }),
        _ => Err(ValidationError::new("Missing required fields")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn signup_normalizes_email_and_checks_password_length() {
        let signup = parse_student_signup(&json!({
            "student_id": " 20231234 ",
            "name": "Sam Lee",
            "email": "Sam@Example.EDU",
            "password": "correct horse"
        }))
        .unwrap();
        assert_eq!(signup.email, "sam@example.edu");
        assert_eq!(signup.student_id, "20231234");

        let err = parse_student_signup(&json!({
            "student_id": "20231234",
            "name": "Sam Lee",
            "email": "sam@example.edu",
            "password": "short"
        }))
        .unwrap_err();
        assert!(err.field_errors.contains_key("password"));
    }

    #[test]
    fn signup_rejects_bad_email() {
        let err = parse_student_signup(&json!({
            "student_id": "20231234",
            "name": "Sam",
            "email": "not-an-email",
            "password": "longenough"
        }))
        .unwrap_err();
        assert_eq!(err.field_errors["email"], "Invalid email format");
    }

    #[test]
    fn signup_requires_university_number() {
        let err = parse_student_signup(&json!({
            "name": "Sam",
            "email": "sam@example.edu",
            "password": "longenough"
        }))
        .unwrap_err();
        assert_eq!(err.message, "Missing required fields");
        assert!(err.field_errors.contains_key("student_id"));

        let signup = parse_student_signup(&json!({
            "student_id": 20231234,
            "name": "Sam",
            "email": "sam@example.edu",
            "password": "longenough"
        }))
        .unwrap();
        assert_eq!(signup.student_id, "20231234");
    }

    #[test]
    fn patch_needs_a_field() {
        let err = parse_student_patch(&json!({"id": 2})).unwrap_err();
        assert_eq!(err.message, "Nothing to update");

        let edit = parse_student_patch(&json!({"id": 2, "name": "Sam"})).unwrap();
        assert_eq!(edit.key, StudentKey::Id(2));
        assert_eq!(edit.name.as_deref(), Some("Sam"));
        assert_eq!(edit.email, None);
    }

    #[test]
    fn patch_prefers_university_number() {
        let edit = parse_student_patch(&json!({"student_id": "S-77", "id": 2, "name": "Sam"})).unwrap();
        assert_eq!(edit.key, StudentKey::StudentId("S-77".to_string()));

        let err = parse_student_patch(&json!({"name": "Sam"})).unwrap_err();
        assert_eq!(err.message, "Missing required fields");
        assert!(err.field_errors.contains_key("student_id"));

        let err = parse_student_patch(&json!({"student_id": "  ", "name": "Sam"})).unwrap_err();
        assert!(err.field_errors.contains_key("student_id"));
    }

    #[test]
    fn student_id_values() {
        assert_eq!(parse_student_id(&json!(" A123 ")), Some("A123".to_string()));
        assert_eq!(parse_student_id(&json!(42)), Some("42".to_string()));
        assert_eq!(parse_student_id(&json!("")), None);
        assert_eq!(parse_student_id(&json!(null)), None);
        assert_eq!(parse_student_id(&json!("x".repeat(MAX_STUDENT_ID_LEN + 1))), None);
    }

    #[test]
    fn password_change_requires_both_passwords() {
        let err = parse_password_change(&json!({"id": 1, "current_password": "oldpassword"})).unwrap_err();
        assert!(err.field_errors.contains_key("new_password"));

        let change = parse_password_change(&json!({
            "student_id": "20231234",
            "current_password": "oldpassword",
            "new_password": "newpassword"
        }))
        .unwrap();
        assert_eq!(change.new_password, "newpassword");
        assert_eq!(change.key, StudentKey::StudentId("20231234".to_string()));
    }

    #[test]
    fn login_requires_email_and_password() {
        let err = parse_login(&json!({"email": "sam@example.edu"})).unwrap_err();
        assert!(err.field_errors.contains_key("password"));

        let err = parse_login(&json!({"email": "sam@example.edu", "password": "short"})).unwrap_err();
        assert!(err.field_errors.contains_key("password"));

        let login = parse_login(&json!({"email": " SAM@example.edu ", "password": "longenough"})).unwrap();
        assert_eq!(login.email, "sam@example.edu");
        assert_eq!(login.password, "longenough");
    }
}
