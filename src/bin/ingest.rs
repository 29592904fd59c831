//! Pulls recent daily quotes from Alpha Vantage into `financial_data`.
//!
//! Runs once and exits non-zero on any fetch or store failure, unless
//! `INGEST_CRON` is set, in which case it keeps running on that schedule.

use std::sync::Arc;

use anyhow::{anyhow, Context};

use financial_data::config::IngestConfig;
use financial_data::db;
use financial_data::external::alphavantage::AlphaVantageProvider;
use financial_data::jobs::ingestion_job::{self, IngestionContext};
use financial_data::logging::{self, LoggingConfig};
use financial_data::store::PgPriceStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let logging_config = LoggingConfig::from_env("financial-data-ingest").map_err(|e| anyhow!(e))?;
    logging::init_logging(logging_config).map_err(|e| anyhow!(e.to_string()))?;

    let config = IngestConfig::from_env()?;

    let provider = AlphaVantageProvider::new(&config.alphavantage)
        .context("failed to build the Alpha Vantage client")?;

    let pool = db::connect(&config.database_url, config.max_connections)
        .await
        .context("failed to connect to the database")?;
    db::migrate(&pool).await.context("failed to run migrations")?;

    let ctx = IngestionContext {
        provider: Arc::new(provider),
        store: Arc::new(PgPriceStore::new(pool)),
    };

    match config.schedule.as_deref() {
        None => {
            ingestion_job::run_once(&ctx).await?;
        }
        Some(schedule) => {
            let mut scheduler = ingestion_job::start_scheduled(ctx, schedule).await?;
            tokio::signal::ctrl_c().await?;
            tracing::info!("🛑 Stopping ingestion scheduler...");
            scheduler
                .shutdown()
                .await
                .map_err(|e| anyhow!("failed to stop scheduler: {}", e))?;
        }
    }

    Ok(())
}
