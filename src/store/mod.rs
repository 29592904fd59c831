#[cfg(test)]
pub(crate) mod memory;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::db;
use crate::models::{PageRequest, PriceRecord, RecordFilter};

/// Persistence for daily price records.
#[async_trait]
pub trait PriceStore: Send + Sync {
    /// Total number of rows matching `filter`, plus the requested page of them
    /// (every matching row when `page` is `None`).
    async fn find(
        &self,
        filter: &RecordFilter,
        page: Option<PageRequest>,
    ) -> Result<(i64, Vec<PriceRecord>), sqlx::Error>;

    /// Upsert all records atomically; returns the number of rows written.
    async fn upsert(&self, records: &[PriceRecord]) -> Result<u64, sqlx::Error>;

    async fn ping(&self) -> Result<(), sqlx::Error>;
}

#[derive(Clone)]
pub struct PgPriceStore {
    pool: PgPool,
}

impl PgPriceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PriceStore for PgPriceStore {
    async fn find(
        &self,
        filter: &RecordFilter,
        page: Option<PageRequest>,
    ) -> Result<(i64, Vec<PriceRecord>), sqlx::Error> {
        db::financial_data_queries::find(&self.pool, filter, page).await
    }

    async fn upsert(&self, records: &[PriceRecord]) -> Result<u64, sqlx::Error> {
        db::financial_data_queries::upsert_records(&self.pool, records).await
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        db::financial_data_queries::ping(&self.pool).await
    }
}
