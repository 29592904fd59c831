use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::models::{PageRequest, PriceRecord, RecordFilter};
use crate::store::PriceStore;

/// Test double keyed the way the table is ordered: (date, symbol).
#[derive(Default)]
pub(crate) struct InMemoryPriceStore {
    rows: Mutex<BTreeMap<(NaiveDate, String), PriceRecord>>,
    unavailable: AtomicBool,
}

impl InMemoryPriceStore {
    pub(crate) fn with_records(records: Vec<PriceRecord>) -> Self {
        let store = Self::default();
        {
            let mut rows = store.rows.lock().unwrap();
            for record in records {
                rows.insert((record.date, record.symbol.clone()), record);
            }
        }
        store
    }

    /// Every call fails as if the pool were closed.
    pub(crate) fn unavailable() -> Self {
        let store = Self::default();
        store.unavailable.store(true, Ordering::SeqCst);
        store
    }

    pub(crate) fn all(&self) -> Vec<PriceRecord> {
        self.rows.lock().unwrap().values().cloned().collect()
    }

    fn check(&self) -> Result<(), sqlx::Error> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(sqlx::Error::PoolClosed);
        }
        Ok(())
    }
}

/// Same predicate as the SQL `WHERE` clause; date bounds are inclusive.
fn matches(filter: &RecordFilter, record: &PriceRecord) -> bool {
    filter.symbol.map_or(true, |s| s.as_str() == record.symbol)
        && filter.start_date.map_or(true, |start| record.date >= start)
        && filter.end_date.map_or(true, |end| record.date <= end)
}

#[async_trait]
impl PriceStore for InMemoryPriceStore {
    async fn find(
        &self,
        filter: &RecordFilter,
        page: Option<PageRequest>,
    ) -> Result<(i64, Vec<PriceRecord>), sqlx::Error> {
        self.check()?;
        let rows = self.rows.lock().unwrap();
        let matching: Vec<PriceRecord> = rows
            .values()
            .filter(|r| matches(filter, r))
            .cloned()
            .collect();
        let total = matching.len() as i64;

        let records = match page {
            Some(page) => matching
                .into_iter()
                .skip(page.offset() as usize)
                .take(page.limit as usize)
                .collect(),
            None => matching,
        };
        Ok((total, records))
    }

    async fn upsert(&self, records: &[PriceRecord]) -> Result<u64, sqlx::Error> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        for record in records {
            rows.insert((record.date, record.symbol.clone()), record.clone());
        }
        Ok(records.len() as u64)
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        self.check()
    }
}

#[cfg(test)]
mod tests {
    use bigdecimal::BigDecimal;

    use super::*;
    use crate::models::Symbol;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(symbol: Symbol, date: NaiveDate) -> PriceRecord {
        PriceRecord::new(symbol, date, BigDecimal::from(1), BigDecimal::from(1), 1)
    }

    #[test]
    fn test_filter_bounds_are_inclusive() {
        let filter = RecordFilter {
            symbol: Some(Symbol::Ibm),
            start_date: Some(date(2024, 3, 1)),
            end_date: Some(date(2024, 3, 5)),
        };

        assert!(matches(&filter, &record(Symbol::Ibm, date(2024, 3, 1))));
        assert!(matches(&filter, &record(Symbol::Ibm, date(2024, 3, 5))));
        assert!(!matches(&filter, &record(Symbol::Ibm, date(2024, 3, 6))));
        assert!(!matches(&filter, &record(Symbol::Aapl, date(2024, 3, 3))));
        assert!(matches(&RecordFilter::default(), &record(Symbol::Aapl, date(1999, 1, 1))));
    }
}
