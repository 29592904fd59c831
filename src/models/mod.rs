mod financial_data;
mod price_record;
mod query;

pub use financial_data::{
    EmptyObject, ErrorDetail, FinancialDataResponse, Info, OrEmpty, Pagination, Statistics,
    StatisticsResponse, ValidationErrorResponse,
};
pub use price_record::{parse_iso_date, PriceRecord, Symbol, UnsupportedSymbol};
pub use query::{
    FinancialDataQuery, PageRequest, RawFinancialDataQuery, RawStatisticsQuery, RecordFilter,
    StatisticsQuery,
};
