use async_trait::async_trait;
use thiserror::Error;

use crate::models::Symbol;

/// One day of the provider's time series, before any validation.
///
/// Fields are `None` when the provider omitted them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDailyQuote {
    pub date: String,
    pub open: Option<String>,
    pub close: Option<String>,
    pub volume: Option<String>,
}

#[derive(Debug, Error)]
pub enum PriceProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected status {status}: {body}")]
    BadStatus { status: u16, body: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("Cannot find Time Series (Daily) data in the response")]
    MissingTimeSeries,

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("provider rejected the request: {0}")]
    Api(String),
}

#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Daily quotes for `symbol`, oldest first.
    async fn fetch_daily_quotes(&self, symbol: Symbol) -> Result<Vec<RawDailyQuote>, PriceProviderError>;
}
