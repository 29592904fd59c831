//! Store tests against a real Postgres.
//!
//! Run with `DATABASE_URL` pointing at a server where the test user may create
//! databases, then `cargo test -- --ignored`.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use sqlx::PgPool;

use financial_data::models::{PageRequest, PriceRecord, RecordFilter, Symbol};
use financial_data::store::{PgPriceStore, PriceStore};

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
}

fn record(symbol: Symbol, day: u32, open: &str, close: &str, volume: i64) -> PriceRecord {
    PriceRecord::new(
        symbol,
        date(day),
        BigDecimal::from_str(open).unwrap(),
        BigDecimal::from_str(close).unwrap(),
        volume,
    )
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn upsert_overwrites_the_same_symbol_and_date(pool: PgPool) {
    let store = PgPriceStore::new(pool);

    store
        .upsert(&[record(Symbol::Ibm, 18, "190.10", "191.20", 100)])
        .await
        .unwrap();
    store
        .upsert(&[record(Symbol::Ibm, 18, "195.00", "196.50", 250)])
        .await
        .unwrap();

    let (count, rows) = store.find(&RecordFilter::default(), None).await.unwrap();
    assert_eq!(count, 1);
    assert_eq!(rows, vec![record(Symbol::Ibm, 18, "195.00", "196.50", 250)]);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn find_filters_counts_and_paginates(pool: PgPool) {
    let store = PgPriceStore::new(pool);
    let mut batch: Vec<PriceRecord> = (1..=9)
        .map(|day| record(Symbol::Aapl, day, "170", "171", i64::from(day)))
        .collect();
    batch.push(record(Symbol::Ibm, 5, "190", "191", 1));
    store.upsert(&batch).await.unwrap();

    let filter = RecordFilter {
        symbol: Some(Symbol::Aapl),
        start_date: Some(date(2)),
        end_date: Some(date(8)),
    };
    let (count, rows) = store
        .find(&filter, Some(PageRequest { limit: 5, page: 2 }))
        .await
        .unwrap();

    assert_eq!(count, 7);
    let dates: Vec<NaiveDate> = rows.iter().map(|r| r.date).collect();
    assert_eq!(dates, vec![date(7), date(8)]);

    let (count, rows) = store.find(&RecordFilter::default(), None).await.unwrap();
    assert_eq!(count, 10);
    // date ascending, then symbol
    assert_eq!(rows[4].symbol, "AAPL");
    assert_eq!(rows[5].symbol, "IBM");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn failed_upsert_rolls_back_the_whole_batch(pool: PgPool) {
    let store = PgPriceStore::new(pool);
    let mut rejected = record(Symbol::Ibm, 2, "190", "191", 1);
    rejected.volume = -1;

    let result = store
        .upsert(&[record(Symbol::Ibm, 1, "190", "191", 1), rejected])
        .await;

    assert!(result.is_err());
    let (count, _) = store.find(&RecordFilter::default(), None).await.unwrap();
    assert_eq!(count, 0);
}
