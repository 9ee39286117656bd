use axum::Json;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use super::dto;
use super::handlers;
use super::response;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "AskPDF API",
        version = "1.0.0",
        description = "Upload a PDF and ask questions about it through a ChatPDF-compatible provider.",
    ),
    paths(
        handlers::health::health_check,
        handlers::documents::upload_document,
        handlers::documents::get_pdf,
        handlers::chats::send_chat,
        handlers::chats::get_history,
    ),
    components(schemas(
        response::ApiError,
        dto::UploadForm,
        dto::UploadResponse,
        dto::ChatRequest,
        dto::ChatResponse,
        crate::models::ChatRole,
        crate::models::ChatTurn,
        crate::models::ChatHistory,
        handlers::health::HealthData,
        handlers::health::ProviderStatus,
    )),
    tags(
        (name = "health", description = "Health check"),
        (name = "documents", description = "PDF upload and retrieval"),
        (name = "chats", description = "Questions and history for an uploaded PDF"),
    ),
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn redoc_router<S: Clone + Send + Sync + 'static>() -> axum::Router<S> {
    Redoc::with_url("/docs", ApiDoc::openapi()).into()
}
