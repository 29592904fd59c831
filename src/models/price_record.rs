use std::fmt;
use std::str::FromStr;

use bigdecimal::{BigDecimal, ToPrimitive};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};
use sqlx::FromRow;
use thiserror::Error;
use utoipa::ToSchema;

/// Ticker symbols the service stores quotes for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Symbol {
    #[serde(rename = "AAPL")]
    Aapl,
    #[serde(rename = "IBM")]
    Ibm,
}

impl Symbol {
    /// Symbols tracked by ingestion, in the order they are fetched.
    pub const TRACKED: [Symbol; 2] = [Symbol::Ibm, Symbol::Aapl];

    pub fn as_str(&self) -> &'static str {
        match self {
            Symbol::Aapl => "AAPL",
            Symbol::Ibm => "IBM",
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("only \"AAPL\" or \"IBM\" is supported")]
pub struct UnsupportedSymbol;

impl FromStr for Symbol {
    type Err = UnsupportedSymbol;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AAPL" => Ok(Symbol::Aapl),
            "IBM" => Ok(Symbol::Ibm),
            _ => Err(UnsupportedSymbol),
        }
    }
}

// One daily quote; (symbol, date) is the primary key of `financial_data`.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct PriceRecord {
    #[schema(example = "IBM")]
    pub symbol: String,
    pub date: NaiveDate,
    #[serde(serialize_with = "decimal_as_number")]
    #[schema(value_type = f64, example = 191.49)]
    pub open_price: BigDecimal,
    #[serde(serialize_with = "decimal_as_number")]
    #[schema(value_type = f64, example = 193.34)]
    pub close_price: BigDecimal,
    pub volume: i64,
}

impl PriceRecord {
    pub fn new(
        symbol: Symbol,
        date: NaiveDate,
        open_price: BigDecimal,
        close_price: BigDecimal,
        volume: i64,
    ) -> Self {
        Self {
            symbol: symbol.as_str().to_string(),
            date,
            open_price,
            close_price,
            volume,
        }
    }
}

/// Parses a strict `YYYY-MM-DD` date. Chrono's `%Y-%m-%d` on its own also
/// takes unpadded fields, short years and a leading sign.
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    let bytes = raw.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Emits a NUMERIC value as a JSON number instead of bigdecimal's string form.
pub(crate) fn decimal_as_number<S>(value: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value.to_f64() {
        Some(number) => serializer.serialize_f64(number),
        None => Err(serde::ser::Error::custom(format!(
            "{} cannot be represented as a JSON number",
            value
        ))),
    }
}
