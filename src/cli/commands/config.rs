use serde_json::json;

use crate::cli::{utils::output_success, OutputFormat};
use crate::config::AppConfig;

pub fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    let safe = config.redacted();

    match output_format {
        OutputFormat::Json => output_success(&output_format, "Configuration loaded", Some(json!({ "config": safe }))),
        OutputFormat::Text => {
            println!("{}", serde_json::to_string_pretty(&safe)?);
            if config.database.url.is_none() {
                eprintln!("warning: DATABASE_URL is not set; the server will not start");
            }
            if config.security.jwt_secret.is_empty() {
                eprintln!("warning: JWT_SECRET is not set; login cannot issue tokens");
            }
            Ok(())
        }
    }
}
