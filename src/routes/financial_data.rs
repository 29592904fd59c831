use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::{
    FinancialDataResponse, RawFinancialDataQuery, RawStatisticsQuery, StatisticsResponse,
};
use crate::services::{financial_data_service, query_validation};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/financial_data", get(get_financial_data))
        .route("/statistics", get(get_statistics))
}

#[utoipa::path(
    get,
    path = "/api/financial_data",
    tag = "Get financial data",
    params(RawFinancialDataQuery),
    responses(
        (status = 200, description = "Matching records, oldest first. Rejected queries also answer 200, with `info.error` listing every message", body = FinancialDataResponse)
    )
)]
pub async fn get_financial_data(
    State(state): State<AppState>,
    Query(raw): Query<RawFinancialDataQuery>,
) -> Result<Json<FinancialDataResponse>, AppError> {
    info!("GET /api/financial_data - {:?}", raw);
    let today = Utc::now().date_naive();
    let query = query_validation::validate_financial_data_query(&raw, today).map_err(|e| {
        warn!("Rejected financial data query: {}", e);
        e
    })?;

    let response = financial_data_service::get_financial_data(state.store.as_ref(), &query).await;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/statistics",
    tag = "Get statistical data",
    params(RawStatisticsQuery),
    responses(
        (status = 200, description = "Daily averages over the range, rounded to 2 places", body = StatisticsResponse)
    )
)]
pub async fn get_statistics(
    State(state): State<AppState>,
    Query(raw): Query<RawStatisticsQuery>,
) -> Result<Json<StatisticsResponse>, AppError> {
    info!("GET /api/statistics - {:?}", raw);
    let today = Utc::now().date_naive();
    let query = query_validation::validate_statistics_query(&raw, today).map_err(|e| {
        warn!("Rejected statistics query: {}", e);
        e
    })?;

    let response = financial_data_service::get_statistics(state.store.as_ref(), &query).await;
    Ok(Json(response))
}
