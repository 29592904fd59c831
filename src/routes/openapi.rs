use axum::{routing::get, Json, Router};
use utoipa::OpenApi;

use crate::models::{
    ErrorDetail, FinancialDataResponse, Info, Pagination, PriceRecord, Statistics,
    StatisticsResponse, Symbol, ValidationErrorResponse,
};
use crate::routes::{financial_data, health};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "CTW Take-Home Assignment",
        version = "1.0.0",
        description = "## Descriptions
Daily open/close prices and volumes of tracked stocks, refreshed from Alpha Vantage by the `ingest` job.

## APIs
### Retrieve records from financial_data
- Query prices by symbols.
- Symbols may be either **AAPL** or **IBM**.
- **start_date** and **end_date** cannot be later than today, and **start_date** must be before **end_date**.
- The date format should be YYYY-MM-DD, e.g., 2023-01-01.
- Pagination is implemented.

### Get statistics of financial_data
- Query prices by symbols.
- Symbols may be either **AAPL** or **IBM**.
- **start_date** and **end_date** must fall within the last 14 days, and **start_date** must be before **end_date**.
- The date format should be YYYY-MM-DD, e.g., 2023-01-01.
"
    ),
    paths(
        financial_data::get_financial_data,
        financial_data::get_statistics,
        health::health
    ),
    components(schemas(
        Symbol,
        PriceRecord,
        Pagination,
        ErrorDetail,
        Info,
        FinancialDataResponse,
        Statistics,
        StatisticsResponse,
        ValidationErrorResponse
    )),
    tags(
        (name = "Get financial data", description = "Retrieve financial data records that match the specified period and symbol"),
        (name = "Get statistical data", description = "Calculate the average daily open price, average daily close price, average daily volume for the specified period"),
        (name = "health", description = "Liveness of the service and its store")
    )
)]
pub struct ApiDoc;

pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::app::create_app;
    use crate::state::AppState;
    use crate::store::memory::InMemoryPriceStore;

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let app = create_app(AppState { store: Arc::new(InMemoryPriceStore::default()) });

        let response = app
            .oneshot(Request::builder().uri("/openapi.json").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let doc: Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(doc["info"]["title"], "CTW Take-Home Assignment");
        assert_eq!(doc["info"]["version"], "1.0.0");
        assert!(doc["info"]["description"].as_str().unwrap().contains("**AAPL** or **IBM**"));

        let tags: Vec<&str> = doc["tags"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|t| t["name"].as_str())
            .collect();
        assert!(tags.contains(&"Get financial data"));
        assert!(tags.contains(&"Get statistical data"));

        let records = &doc["paths"]["/api/financial_data"]["get"];
        assert_eq!(records["tags"][0], "Get financial data");
        let params: Vec<&str> = records["parameters"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|p| p["name"].as_str())
            .collect();
        assert_eq!(params, ["symbol", "start_date", "end_date", "limit", "page"]);

        assert_eq!(doc["paths"]["/api/statistics"]["get"]["tags"][0], "Get statistical data");
        assert!(doc["components"]["schemas"]["PriceRecord"].is_object());
    }
}
