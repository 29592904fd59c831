use axum::extract::State;
use axum::{routing::get, Router};
use tracing::{error, info};

use crate::errors::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(health))
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Store reachable", body = String),
        (status = 503, description = "Store unreachable")
    )
)]
pub(crate) async fn health(State(state): State<AppState>) -> Result<&'static str, AppError> {
    info!("GET /health - Health check");
    state.store.ping().await.map_err(|e| {
        error!("Health check failed, store unreachable: {}", e);
        AppError::Db(e)
    })?;
    Ok("OK")
}
