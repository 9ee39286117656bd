//! Chat handlers: question forwarding and history lookup.

use axum::extract::{Path, State};

use crate::api::dto::{ChatRequest, ChatResponse};
use crate::api::extractors::JsonBody;
use crate::api::response::{ApiError, ApiResponse};
use crate::api::AppState;
use crate::models::{ChatHistory, ProviderSource};

/// `POST /chats`
///
/// Forwards one question about a provider source and returns the answer.
#[utoipa::path(
    post,
    path = "/chats",
    tag = "chats",
    operation_id = "chats.send",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Generated answer", body = ChatResponse),
        (status = 400, description = "Malformed body or empty query", body = ApiError),
        (status = 500, description = "Provider call failed", body = ApiError),
    )
)]
pub async fn send_chat(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<ChatRequest>,
) -> ApiResponse<ChatResponse> {
    let source = ProviderSource::new(req.chat_pdf_source_id);

    match state.chat.ask(&source, &req.query).await {
        Ok(text) => ApiResponse::success(ChatResponse { text }),
        Err(e) => ApiResponse::from_error(e, "Failed to perform chat with ChatPDF."),
    }
}

/// `GET /chats/history/{sID}`
///
/// Returns whatever history the provider keeps for a source.
#[utoipa::path(
    get,
    path = "/chats/history/{sID}",
    tag = "chats",
    operation_id = "chats.history",
    params(("sID" = String, Path, description = "Provider source id (`chatPdfSourceId`)")),
    responses(
        (status = 200, description = "Chat history for the source", body = ChatHistory),
        (status = 500, description = "Provider call failed", body = ApiError),
    )
)]
pub async fn get_history(
    State(state): State<AppState>,
    Path(source_id): Path<String>,
) -> ApiResponse<ChatHistory> {
    match state.chat.history(&ProviderSource::new(source_id)).await {
        Ok(history) => ApiResponse::success(history),
        Err(e) => ApiResponse::from_error(e, "Failed to fetch chat history."),
    }
}
