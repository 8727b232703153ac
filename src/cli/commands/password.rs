use serde_json::json;

use crate::auth::hash_password;
use crate::cli::{utils::output_error, utils::output_success, OutputFormat};
use crate::validation::MIN_PASSWORD_LEN;

pub fn handle(password: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        output_error(
            &output_format,
            &format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
            Some("VALIDATION_ERROR"),
        )?;
        anyhow::bail!("password too short");
    }

    let hash = hash_password(password).map_err(|e| anyhow::anyhow!("hashing failed: {}", e))?;
    match output_format {
        OutputFormat::Json => output_success(&output_format, "Password hashed", Some(json!({ "hash": hash }))),
        OutputFormat::Text => {
            println!("{}", hash);
            Ok(())
        }
    }
}
