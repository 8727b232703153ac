use anyhow::Context;

use crate::cli::{utils::output_success, OutputFormat};
use crate::config::AppConfig;
use crate::database::DatabaseManager;

pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    let database = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to database")?;

    let result = database.migrate().await.context("failed to apply migrations");
    database.close().await;
    result?;

    output_success(&output_format, "Migrations applied", None)
}
