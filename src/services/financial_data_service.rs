use tracing::{error, info};

use crate::models::{
    FinancialDataQuery, FinancialDataResponse, Info, OrEmpty, Pagination, Statistics,
    StatisticsQuery, StatisticsResponse,
};
use crate::services::aggregation;
use crate::store::PriceStore;

/// One page of matching records plus pagination totals.
///
/// A store failure does not propagate: it is reported in `info.error` with
/// empty `data` and `pagination`.
pub async fn get_financial_data(
    store: &dyn PriceStore,
    query: &FinancialDataQuery,
) -> FinancialDataResponse {
    let page = query.page_request();

    match store.find(&query.filter(), Some(page)).await {
        Ok((count, records)) => {
            info!(
                "Found {} financial data records, returning page {} ({} rows)",
                count,
                page.page,
                records.len()
            );
            FinancialDataResponse {
                data: records,
                pagination: OrEmpty::Value(Pagination::new(count, page.page, page.limit)),
                info: Info::ok(),
            }
        }
        Err(e) => {
            error!("Failed to fetch financial data for {:?}: {}", query, e);
            FinancialDataResponse::failed(e.to_string())
        }
    }
}

/// Averages over every record of `query.symbol` in the date range, unpaginated.
pub async fn get_statistics(store: &dyn PriceStore, query: &StatisticsQuery) -> StatisticsResponse {
    match store.find(&query.filter(), None).await {
        Ok((count, records)) => {
            info!(
                "Computing statistics for {} from {} to {} over {} records",
                query.symbol, query.start_date, query.end_date, count
            );
            let averages = aggregation::aggregate(&records);
            StatisticsResponse {
                data: OrEmpty::Value(Statistics {
                    symbol: query.symbol,
                    start_date: query.start_date,
                    end_date: query.end_date,
                    average_daily_open_price: averages.open_price,
                    average_daily_close_price: averages.close_price,
                    average_daily_volume: averages.volume,
                }),
                info: Info::ok(),
            }
        }
        Err(e) => {
            error!("Failed to compute statistics for {:?}: {}", query, e);
            StatisticsResponse::failed(e.to_string())
        }
    }
}
