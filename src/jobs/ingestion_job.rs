//! Daily Quote Ingestion Job
//!
//! Fetches the compact daily time series of every tracked symbol from the
//! market data provider and upserts the last two weeks into `financial_data`.
//!
//! # Modes
//!
//! - **One-shot** (default): [`run_once`] ingests every symbol and returns the
//!   first fatal error, which the `ingest` binary turns into a non-zero exit.
//! - **Scheduled**: [`start_scheduled`] registers the same run with
//!   `tokio-cron-scheduler`. A failed tick is logged and the next tick still
//!   fires.
//!
//! # Error Handling
//!
//! - A malformed day is skipped and logged; the rest of the symbol is kept
//! - A provider or store failure aborts the run; symbols already written stay
//!   committed

use std::sync::Arc;

use chrono::Utc;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

use crate::errors::AppError;
use crate::external::price_provider::PriceProvider;
use crate::models::Symbol;
use crate::services::ingestion_service::{self, IngestError, SymbolSummary};
use crate::store::PriceStore;

#[derive(Clone)]
pub struct IngestionContext {
    pub provider: Arc<dyn PriceProvider>,
    pub store: Arc<dyn PriceStore>,
}

pub async fn run_once(ctx: &IngestionContext) -> Result<Vec<(Symbol, SymbolSummary)>, IngestError> {
    let today = Utc::now().date_naive();
    info!("📥 Starting quote ingestion for {:?} (today: {})", Symbol::TRACKED, today);

    let summaries = ingestion_service::ingest_all(
        ctx.provider.as_ref(),
        ctx.store.as_ref(),
        &Symbol::TRACKED,
        today,
    )
    .await?;

    let upserted: u64 = summaries.iter().map(|(_, s)| s.upserted).sum();
    info!("✅ Quote ingestion finished: {} rows upserted", upserted);
    Ok(summaries)
}

/// Register [`run_once`] on `schedule` (sec min hour day month weekday) and
/// start the scheduler. The returned scheduler must be kept alive.
pub async fn start_scheduled(ctx: IngestionContext, schedule: &str) -> Result<JobScheduler, AppError> {
    let job = Job::new_async(schedule, move |_uuid, _l| {
        let ctx = ctx.clone();
        Box::pin(async move {
            if let Err(e) = run_once(&ctx).await {
                error!("❌ Scheduled quote ingestion failed: {}", e);
            }
        })
    })
    .map_err(|e| AppError::Config(format!("Invalid INGEST_CRON {:?}: {}", schedule, e)))?;

    let scheduler = JobScheduler::new()
        .await
        .map_err(|e| AppError::External(format!("Failed to create scheduler: {}", e)))?;

    scheduler
        .add(job)
        .await
        .map_err(|e| AppError::External(format!("Failed to add ingestion job: {}", e)))?;
    scheduler
        .start()
        .await
        .map_err(|e| AppError::External(format!("Failed to start scheduler: {}", e)))?;

    info!("📅 Scheduled: quote ingestion [cron: {}]", schedule);
    Ok(scheduler)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::price_provider::{PriceProviderError, RawDailyQuote};
    use crate::store::memory::InMemoryPriceStore;
    use async_trait::async_trait;

    struct RecentQuotes;

    #[async_trait]
    impl PriceProvider for RecentQuotes {
        async fn fetch_daily_quotes(&self, _symbol: Symbol) -> Result<Vec<RawDailyQuote>, PriceProviderError> {
            let today = Utc::now().date_naive();
            Ok(vec![RawDailyQuote {
                date: today.format("%Y-%m-%d").to_string(),
                open: Some("10.5".into()),
                close: Some("11.25".into()),
                volume: Some("1000".into()),
            }])
        }
    }

    #[tokio::test]
    async fn test_run_once_ingests_every_tracked_symbol() {
        let store = Arc::new(InMemoryPriceStore::default());
        let ctx = IngestionContext {
            provider: Arc::new(RecentQuotes),
            store: store.clone(),
        };

        let summaries = run_once(&ctx).await.unwrap();

        assert_eq!(summaries.len(), Symbol::TRACKED.len());
        assert_eq!(store.all().len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_cron_is_a_config_error() {
        let ctx = IngestionContext {
            provider: Arc::new(RecentQuotes),
            store: Arc::new(InMemoryPriceStore::default()),
        };

        let Err(err) = start_scheduled(ctx, "every tuesday").await else {
            panic!("expected an invalid cron expression to be rejected");
        };

        assert!(matches!(err, AppError::Config(_)));
    }
}
