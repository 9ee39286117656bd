use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AskPdfError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Payload too large: {size} bytes (max {max} bytes)")]
    PayloadTooLarge { size: usize, max: usize },

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Provider authentication error: {0}")]
    ProviderAuth(String),

    #[error("Provider rate limit exceeded, retry after {retry_after:?} seconds")]
    ProviderRateLimit { retry_after: Option<u64> },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AskPdfError {
    pub fn status(&self) -> StatusCode {
        match self {
            AskPdfError::NotFound(_) => StatusCode::NOT_FOUND,
            AskPdfError::Validation(_) => StatusCode::BAD_REQUEST,
            AskPdfError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AskPdfError::Storage(_)
            | AskPdfError::Http(_)
            | AskPdfError::Provider(_)
            | AskPdfError::ProviderAuth(_)
            | AskPdfError::ProviderRateLimit { .. }
            | AskPdfError::Config(_)
            | AskPdfError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show a client. Server-side failures collapse to a
    /// generic text; their detail only reaches the logs.
    pub fn client_message(&self) -> String {
        match self {
            AskPdfError::NotFound(msg) | AskPdfError::Validation(msg) => msg.clone(),
            AskPdfError::PayloadTooLarge { .. } => "File too large.".to_string(),
            _ => "Internal server error".to_string(),
        }
    }

    /// True for failures that originate at the document QA provider.
    pub fn is_provider_failure(&self) -> bool {
        matches!(
            self,
            AskPdfError::Http(_)
                | AskPdfError::Provider(_)
                | AskPdfError::ProviderAuth(_)
                | AskPdfError::ProviderRateLimit { .. }
        )
    }
}

impl IntoResponse for AskPdfError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        (status, Json(json!({ "error": self.client_message() }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AskPdfError>;
