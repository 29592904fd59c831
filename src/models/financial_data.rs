use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::price_record::decimal_as_number;
use crate::models::{PriceRecord, Symbol};

/// Serializes as `{}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EmptyObject {}

/// A JSON object that is either populated or `{}` when the request failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OrEmpty<T> {
    Value(T),
    Empty(EmptyObject),
}

impl<T> OrEmpty<T> {
    pub fn empty() -> Self {
        OrEmpty::Empty(EmptyObject {})
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            OrEmpty::Value(v) => Some(v),
            OrEmpty::Empty(_) => None,
        }
    }
}

/// `info.error`: an empty string on success, a single message for a store
/// failure, or the list of messages for rejected input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum ErrorDetail {
    Message(String),
    Messages(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Info {
    pub error: ErrorDetail,
}

impl Info {
    pub fn ok() -> Self {
        Self { error: ErrorDetail::Message(String::new()) }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self { error: ErrorDetail::Message(message.into()) }
    }

    pub fn messages(messages: Vec<String>) -> Self {
        Self { error: ErrorDetail::Messages(messages) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct Pagination {
    pub count: i64,
    pub page: i64,
    pub pages: i64,
    pub limit: i64,
}

impl Pagination {
    /// `pages` is `count / limit` rounded down, so a trailing partial page is
    /// not counted (9 rows at 5 per page reports 1 page).
    pub fn new(count: i64, page: i64, limit: i64) -> Self {
        Self {
            count,
            page,
            pages: count / limit,
            limit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FinancialDataResponse {
    pub data: Vec<PriceRecord>,
    /// `{}` when the lookup failed.
    #[schema(value_type = Pagination)]
    pub pagination: OrEmpty<Pagination>,
    pub info: Info,
}

impl FinancialDataResponse {
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            data: Vec::new(),
            pagination: OrEmpty::empty(),
            info: Info::message(message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Statistics {
    pub symbol: Symbol,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(serialize_with = "decimal_as_number")]
    #[schema(value_type = f64)]
    pub average_daily_open_price: BigDecimal,
    #[serde(serialize_with = "decimal_as_number")]
    #[schema(value_type = f64)]
    pub average_daily_close_price: BigDecimal,
    #[serde(serialize_with = "decimal_as_number")]
    #[schema(value_type = f64)]
    pub average_daily_volume: BigDecimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct StatisticsResponse {
    /// `{}` when the lookup failed.
    #[schema(value_type = Statistics)]
    pub data: OrEmpty<Statistics>,
    pub info: Info,
}

impl StatisticsResponse {
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            data: OrEmpty::empty(),
            info: Info::message(message),
        }
    }
}

/// Body returned by both endpoints when the query string is rejected.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ValidationErrorResponse {
    pub data: Vec<PriceRecord>,
    #[schema(value_type = Object)]
    pub pagination: EmptyObject,
    pub info: Info,
}

impl ValidationErrorResponse {
    pub fn new(messages: Vec<String>) -> Self {
        Self {
            data: Vec::new(),
            pagination: EmptyObject {},
            info: Info::messages(messages),
        }
    }
}
