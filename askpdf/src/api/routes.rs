use axum::extract::DefaultBodyLimit;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers;
use super::{frontend, openapi};
use super::AppState;

/// Room for multipart boundaries and headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let upload_limit = state
        .config
        .storage
        .max_upload_bytes
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    let api = Router::new()
        .route(
            "/upload",
            post(handlers::documents::upload_document).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/pdf/{sourceId}", get(handlers::documents::get_pdf))
        .route("/chats", post(handlers::chats::send_chat))
        .route("/chats/history/{sID}", get(handlers::chats::get_history))
        .route("/health", get(handlers::health_check))
        .route("/openapi.json", get(openapi::openapi_json))
        .merge(openapi::redoc_router());

    Router::new()
        .merge(api)
        .route("/", get(frontend::serve_root))
        .fallback(frontend::serve_fallback)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
