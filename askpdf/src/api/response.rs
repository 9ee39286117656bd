//! # Response contract
//!
//! Successful calls return their payload as a bare JSON object
//! (`{ "text": "..." }`, `{ "chatPdfSourceId": "...", "yourSourceId": "..." }`).
//! Failed calls return `{ "error": "<message>" }` with a 4xx/5xx status.
//!
//! Server-side failures never leak detail: the handler picks a generic,
//! operation-specific message and the underlying error is logged.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::AskPdfError;

/// Error payload shared by every endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ApiError {
    /// Human-readable description safe to display to end users.
    pub error: String,
}

#[derive(Debug)]
pub enum ApiResponse<T: Serialize> {
    Success { status: StatusCode, data: T },
    Failure { status: StatusCode, error: ApiError },
}

impl<T: Serialize> ApiResponse<T> {
    /// Success response with data (HTTP 200).
    pub fn success(data: T) -> Self {
        Self::Success {
            status: StatusCode::OK,
            data,
        }
    }

    pub fn error(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Failure {
            status,
            error: ApiError {
                error: message.into(),
            },
        }
    }

    /// Convert an [`AskPdfError`] into a response.
    ///
    /// Client errors keep their own message. Server errors are logged via
    /// `tracing::error!` and replaced with `generic`.
    pub fn from_error(err: AskPdfError, generic: &str) -> Self {
        let status = err.status();
        if status.is_server_error() {
            tracing::error!(error = %err, "{generic}");
            Self::error(status, generic)
        } else {
            Self::error(status, err.client_message())
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Success { status, .. } | Self::Failure { status, .. } => *status,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        match self {
            Self::Success { status, data } => (status, Json(data)).into_response(),
            Self::Failure { status, error } => (status, Json(error)).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn success_serializes_payload_flat() {
        let resp = ApiResponse::success(serde_json::json!({ "text": "hi" })).into_response();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json, serde_json::json!({ "text": "hi" }));
    }

    #[tokio::test]
    async fn error_serializes_error_field_only() {
        let resp = ApiResponse::<()>::error(StatusCode::BAD_REQUEST, "No file uploaded.")
            .into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert_eq!(json, serde_json::json!({ "error": "No file uploaded." }));
    }

    #[test]
    fn server_errors_use_generic_message() {
        let resp: ApiResponse<()> = ApiResponse::from_error(
            AskPdfError::Provider("upstream said: secret".into()),
            "Failed to perform chat with ChatPDF.",
        );
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        match resp {
            ApiResponse::Failure { error, .. } => {
                assert_eq!(error.error, "Failed to perform chat with ChatPDF.")
            }
            ApiResponse::Success { .. } => panic!("expected failure"),
        }
    }

    #[test]
    fn client_errors_keep_their_message() {
        let resp: ApiResponse<()> = ApiResponse::from_error(
            AskPdfError::Validation("Query cannot be empty.".into()),
            "unused",
        );
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        match resp {
            ApiResponse::Failure { error, .. } => assert_eq!(error.error, "Query cannot be empty."),
            ApiResponse::Success { .. } => panic!("expected failure"),
        }
    }
}
