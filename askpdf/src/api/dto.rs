//! Wire types for the HTTP API.
//!
//! Field names are camelCase on the wire to match what the browser client
//! sends and expects.

use serde::{Deserialize, Serialize};

use crate::models::UploadOutcome;

/// Multipart body accepted by `POST /upload`. Documentation only; the
/// handler reads the stream field by field.
#[derive(Debug, utoipa::ToSchema)]
pub struct UploadForm {
    /// The PDF to upload. Exactly one `pdf` field is accepted.
    #[schema(value_type = String, format = Binary)]
    pub pdf: Vec<u8>,
}

/// Response body for `POST /upload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Provider source id; pass it back as `chatPdfSourceId` when chatting.
    pub chat_pdf_source_id: String,
    /// Local id; fetch the stored file from `/pdf/{yourSourceId}`.
    pub your_source_id: String,
}

impl From<UploadOutcome> for UploadResponse {
    fn from(outcome: UploadOutcome) -> Self {
        Self {
            chat_pdf_source_id: outcome.source.provider_id,
            your_source_id: outcome.document.local_id.into(),
        }
    }
}

/// Request body for `POST /chats`.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub chat_pdf_source_id: String,
    pub query: String,
}

/// Response body for `POST /chats`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ChatResponse {
    /// The provider's generated answer.
    pub text: String,
}
