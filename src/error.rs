use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Failure of a single page request against a job source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("429 Too Many Requests")]
    RateLimited,

    #[error("Source returned {0}")]
    Status(reqwest::StatusCode),

    #[error("Malformed page: {0}")]
    Decode(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The run finished but no posting survived extraction.
    #[error("No jobs found")]
    NoResults,

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NoResults => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        };
        let message = match self {
            AppError::BadRequest(msg) => msg,
            other => other.to_string(),
        };

        let body = axum::Json(json!({ "error": message }));
        (status, body).into_response()
    }
}
