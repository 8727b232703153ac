use anyhow::Context;
use tracing_subscriber::EnvFilter;

use coursework_api::{app, config, database::DatabaseManager, handlers::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::config();
    tracing::info!("Starting coursework API in {:?} mode", config.environment);

    let database = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    if config.database.auto_migrate {
        database.migrate().await.context("failed to apply migrations")?;
    }

    let state = AppState::postgres(database.clone(), config);
    let router = app::app(state, config);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("listening on http://{}", bind_addr);

    app::serve(listener, router).await.context("server error")?;

    database.close().await;
    tracing::info!("shut down cleanly");
    Ok(())
}
