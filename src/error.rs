use axum::{
    response::{IntoResponse, Response},
    Json,
    http::StatusCode,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Every way a single extraction can fail. The `Display` text is what the
/// caller sees in the `{ "error": ... }` body.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Selector not found on page")]
    SelectorNotFound,

    #[error("Website not found")]
    HostNotFound,

    #[error("Request timeout - website took too long to respond")]
    Timeout,

    #[error("Failed to fetch website: {0}")]
    FetchFailed(String),

    #[error("An unexpected error occurred")]
    Unexpected,
}

impl ScrapeError {
    pub fn status(&self) -> StatusCode {
        match self {
            ScrapeError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ScrapeError::SelectorNotFound => StatusCode::NOT_FOUND,
            ScrapeError::HostNotFound => StatusCode::NOT_FOUND,
            ScrapeError::Timeout => StatusCode::REQUEST_TIMEOUT,
            ScrapeError::FetchFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ScrapeError::Unexpected => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short name of the failure class, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            ScrapeError::InvalidInput(_) => "InvalidInput",
            ScrapeError::SelectorNotFound => "SelectorNotFound",
            ScrapeError::HostNotFound => "HostNotFound",
            ScrapeError::Timeout => "Timeout",
            ScrapeError::FetchFailed(_) => "FetchFailed",
            ScrapeError::Unexpected => "Unexpected",
        }
    }
}

impl IntoResponse for ScrapeError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });

        (status, body).into_response()
    }
}

/// Startup failures while reading the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid port: {0}")]
    InvalidPort(String),

    #[error("Invalid host address: {0}")]
    InvalidHost(String),

    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
