use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::models::Symbol;

/// Query string of `GET /api/financial_data`, exactly as received.
///
/// Every field is kept as a string so that malformed numbers and dates are
/// reported alongside the other validation messages instead of being
/// rejected by the extractor.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RawFinancialDataQuery {
    /// `AAPL` or `IBM`; all symbols when omitted.
    #[param(example = "IBM")]
    pub symbol: Option<String>,
    /// First day to include, `YYYY-MM-DD`.
    #[param(example = "2024-03-01")]
    pub start_date: Option<String>,
    /// Last day to include, `YYYY-MM-DD`.
    #[param(example = "2024-03-14")]
    pub end_date: Option<String>,
    /// Records per page, at least 1. Defaults to 5.
    #[param(example = "5")]
    pub limit: Option<String>,
    /// 1-based page number. Defaults to 1.
    #[param(example = "1")]
    pub page: Option<String>,
}

/// Query string of `GET /api/statistics`, exactly as received.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RawStatisticsQuery {
    /// `AAPL` or `IBM`. Required.
    #[param(example = "AAPL")]
    pub symbol: Option<String>,
    /// Required, no earlier than 14 days ago.
    #[param(example = "2024-03-06")]
    pub start_date: Option<String>,
    /// Required, no later than today.
    #[param(example = "2024-03-20")]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinancialDataQuery {
    pub symbol: Option<Symbol>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub limit: i64,
    pub page: i64,
}

impl FinancialDataQuery {
    pub fn filter(&self) -> RecordFilter {
        RecordFilter {
            symbol: self.symbol,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }

    pub fn page_request(&self) -> PageRequest {
        PageRequest {
            limit: self.limit,
            page: self.page,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatisticsQuery {
    pub symbol: Symbol,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl StatisticsQuery {
    pub fn filter(&self) -> RecordFilter {
        RecordFilter {
            symbol: Some(self.symbol),
            start_date: Some(self.start_date),
            end_date: Some(self.end_date),
        }
    }
}

/// Row filter for the `financial_data` table. Date bounds are inclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub symbol: Option<Symbol>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// 1-based page of `limit` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: i64,
    pub page: i64,
}

impl PageRequest {
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}
