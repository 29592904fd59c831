use std::sync::Arc;

use anyhow::{anyhow, Context};
use tokio::net::TcpListener;

use financial_data::config::ServerConfig;
use financial_data::logging::{self, LoggingConfig};
use financial_data::state::AppState;
use financial_data::store::PgPriceStore;
use financial_data::{app, db};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    let logging_config = LoggingConfig::from_env("financial-data-api").map_err(|e| anyhow!(e))?;
    logging::init_logging(logging_config).map_err(|e| anyhow!(e.to_string()))?;

    let config = ServerConfig::from_env()?;

    let pool = db::connect(&config.database_url, config.max_connections)
        .await
        .context("failed to connect to the database")?;
    db::migrate(&pool).await.context("failed to run migrations")?;

    let state = AppState {
        store: Arc::new(PgPriceStore::new(pool)),
    };
    let app = app::create_app(state);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!("🚀 Financial data API running at http://{}/", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
