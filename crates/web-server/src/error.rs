use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Statistics error: {0}")]
    Analytics(#[from] analytics::AnalyticsError),
    #[error("Invalid crypto currency symbol: {0}")]
    InvalidSymbol(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Analytics(analytics_err) => {
                tracing::error!(error = ?analytics_err, "Statistics query failed.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Price data is currently unavailable".to_string(),
                )
            }
            AppError::InvalidSymbol(symbol) => (
                StatusCode::FORBIDDEN,
                format!("Invalid crypto currency symbol: {}", symbol),
            ),
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
