use std::fmt;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use thiserror::Error;

use crate::models::ValidationErrorResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("External error: {0}")]
    External(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        match self {
            // Rejected input is still answered with 200; the messages travel in `info.error`.
            AppError::Validation(errors) => (
                StatusCode::OK,
                Json(ValidationErrorResponse::new(errors.into_messages())),
            )
                .into_response(),
            AppError::Db(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "Database unavailable").into_response()
            }
            AppError::External(msg) => (StatusCode::BAD_GATEWAY, msg).into_response(),
            AppError::Config(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

/// Every message produced while checking one request, in the order found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.0.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn messages(&self) -> &[String] {
        &self.0
    }

    pub fn into_messages(self) -> Vec<String> {
        self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_keep_insertion_order() {
        let mut errors = ValidationErrors::new();
        assert!(errors.is_empty());

        errors.push("symbol is required");
        errors.push(String::from("end_date is required"));

        assert_eq!(errors.messages(), ["symbol is required", "end_date is required"]);
        assert_eq!(errors.to_string(), "symbol is required; end_date is required");
    }

    #[test]
    fn test_validation_error_is_answered_with_ok() {
        let response = AppError::from(ValidationErrors(vec!["page must be greater than or equal to 1".into()]))
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_db_error_is_service_unavailable() {
        let response = AppError::from(sqlx::Error::PoolTimedOut).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
