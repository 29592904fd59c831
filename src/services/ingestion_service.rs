use std::str::FromStr;

use bigdecimal::{BigDecimal, Signed};
use chrono::{Duration, NaiveDate};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::external::price_provider::{PriceProvider, PriceProviderError, RawDailyQuote};
use crate::models::{parse_iso_date, PriceRecord, Symbol};
use crate::store::PriceStore;

/// Quotes dated on or before `today - INGEST_WINDOW_DAYS` are ignored.
pub const INGEST_WINDOW_DAYS: i64 = 14;

/// `NUMERIC(20, 8)` leaves 12 digits before the decimal point.
const MAX_PRICE_INTEGER_DIGITS: u32 = 12;

/// Why a single day of provider data was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuoteError {
    #[error("invalid date {0:?}")]
    InvalidDate(String),
    #[error("missing field {0:?}")]
    MissingField(&'static str),
    #[error("invalid {field} {value:?}")]
    InvalidNumber { field: &'static str, value: String },
    #[error("{0} must not be negative")]
    Negative(&'static str),
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to fetch quotes for {symbol}: {source}")]
    Provider {
        symbol: Symbol,
        #[source]
        source: PriceProviderError,
    },
    #[error("failed to store quotes for {symbol}: {source}")]
    Store {
        symbol: Symbol,
        #[source]
        source: sqlx::Error,
    },
}

/// Outcome of ingesting one symbol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SymbolSummary {
    pub fetched: usize,
    pub in_window: usize,
    pub skipped: usize,
    pub upserted: u64,
}

/// Turn one provider day into a record, enforcing the table's constraints.
pub fn validate_quote(symbol: Symbol, date: NaiveDate, quote: &RawDailyQuote) -> Result<PriceRecord, QuoteError> {
    let open_price = parse_price("open_price", quote.open.as_deref())?;
    let close_price = parse_price("close_price", quote.close.as_deref())?;

    let raw_volume = quote.volume.as_deref().ok_or(QuoteError::MissingField("volume"))?;
    let volume = raw_volume
        .trim()
        .parse::<i64>()
        .map_err(|_| QuoteError::InvalidNumber { field: "volume", value: raw_volume.to_string() })?;
    if volume < 0 {
        return Err(QuoteError::Negative("volume"));
    }

    Ok(PriceRecord::new(symbol, date, open_price, close_price, volume))
}

fn parse_price(field: &'static str, raw: Option<&str>) -> Result<BigDecimal, QuoteError> {
    let raw = raw.ok_or(QuoteError::MissingField(field))?;
    let price = BigDecimal::from_str(raw.trim())
        .map_err(|_| QuoteError::InvalidNumber { field, value: raw.to_string() })?;
    if price.is_negative() {
        return Err(QuoteError::Negative(field));
    }
    if price >= BigDecimal::from(10i64.pow(MAX_PRICE_INTEGER_DIGITS)) {
        return Err(QuoteError::InvalidNumber { field, value: raw.to_string() });
    }
    Ok(price)
}

/// Fetch, filter, validate and upsert the recent quotes of one symbol.
///
/// Invalid days are logged and skipped. The valid ones are written in a single
/// transaction, so a store failure leaves none of this symbol's batch behind.
pub async fn ingest_symbol(
    provider: &dyn PriceProvider,
    store: &dyn PriceStore,
    symbol: Symbol,
    today: NaiveDate,
) -> Result<SymbolSummary, IngestError> {
    let quotes = provider
        .fetch_daily_quotes(symbol)
        .await
        .map_err(|source| IngestError::Provider { symbol, source })?;

    let window_start = today - Duration::days(INGEST_WINDOW_DAYS);
    let mut summary = SymbolSummary {
        fetched: quotes.len(),
        ..Default::default()
    };
    let mut records = Vec::new();

    for quote in &quotes {
        let date = match parse_iso_date(quote.date.trim()) {
            Some(date) => date,
            None => {
                warn!("Skipping {} quote: {} ({:?})", symbol, QuoteError::InvalidDate(quote.date.clone()), quote);
                summary.skipped += 1;
                continue;
            }
        };
        if date <= window_start {
            continue;
        }
        summary.in_window += 1;

        match validate_quote(symbol, date, quote) {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!("Skipping {} quote for {}: {} ({:?})", symbol, date, e, quote);
                summary.skipped += 1;
            }
        }
    }

    summary.upserted = store
        .upsert(&records)
        .await
        .map_err(|source| IngestError::Store { symbol, source })?;

    info!(
        "Ingested {}: fetched {}, in window {}, skipped {}, upserted {}",
        symbol, summary.fetched, summary.in_window, summary.skipped, summary.upserted
    );
    Ok(summary)
}

/// Ingest every symbol in order, stopping at the first fetch or store failure.
/// Symbols completed before the failure stay committed.
pub async fn ingest_all(
    provider: &dyn PriceProvider,
    store: &dyn PriceStore,
    symbols: &[Symbol],
    today: NaiveDate,
) -> Result<Vec<(Symbol, SymbolSummary)>, IngestError> {
    let mut summaries = Vec::with_capacity(symbols.len());
    for &symbol in symbols {
        match ingest_symbol(provider, store, symbol, today).await {
            Ok(summary) => summaries.push((symbol, summary)),
            Err(e) => {
                error!("Ingestion aborted: {}", e);
                return Err(e);
            }
        }
    }
    Ok(summaries)
}
