//! Document handlers: PDF upload and retrieval of stored PDFs.

use axum::body::Body;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use tokio_util::io::ReaderStream;

use crate::api::dto::UploadResponse;
use crate::api::response::{ApiError, ApiResponse};
use crate::api::AppState;
use crate::error::{AskPdfError, Result};
use crate::models::LocalId;
use crate::storage::OpenedDocument;

const FILE_FIELD: &str = "pdf";

const NO_FILE: &str = "No file uploaded.";
const SAVE_FAILED: &str = "Failed to save the PDF file.";
const PROVIDER_FAILED: &str = "Failed to upload PDF to ChatPDF.";
const PDF_NOT_FOUND: &str = "PDF not found.";

/// `POST /upload`
///
/// Stores the `pdf` field locally, registers it with the provider and
/// returns both identifiers.
#[utoipa::path(
    post,
    path = "/upload",
    tag = "documents",
    operation_id = "documents.upload",
    request_body(content = crate::api::dto::UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "PDF stored and registered with the provider", body = UploadResponse),
        (status = 400, description = "No file, more than one file, or malformed body", body = ApiError),
        (status = 413, description = "File exceeds the upload limit", body = ApiError),
        (status = 500, description = "Local write or provider call failed", body = ApiError),
    )
)]
pub async fn upload_document(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> ApiResponse<UploadResponse> {
    let mut multipart = match multipart {
        Ok(m) => m,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Upload without a multipart body");
            return ApiResponse::error(StatusCode::BAD_REQUEST, NO_FILE);
        }
    };

    let max = state.config.storage.max_upload_bytes;
    let mut file_bytes: Option<Vec<u8>> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return multipart_error(e),
        };

        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        if file_bytes.is_some() {
            return ApiResponse::error(StatusCode::BAD_REQUEST, "Only one file may be uploaded.");
        }

        let bytes = match field.bytes().await {
            Ok(b) => b,
            Err(e) => return multipart_error(e),
        };

        if bytes.len() > max {
            let err = AskPdfError::PayloadTooLarge {
                size: bytes.len(),
                max,
            };
            tracing::debug!(error = %err, "Rejected upload");
            return ApiResponse::error(err.status(), err.client_message());
        }

        file_bytes = Some(bytes.to_vec());
    }

    let bytes = match file_bytes {
        Some(b) => b,
        None => return ApiResponse::error(StatusCode::BAD_REQUEST, NO_FILE),
    };

    match state.uploads.ingest(&bytes).await {
        Ok(outcome) => ApiResponse::success(UploadResponse::from(outcome)),
        Err(e) if e.is_provider_failure() => ApiResponse::from_error(e, PROVIDER_FAILED),
        Err(e @ AskPdfError::Storage(_)) => ApiResponse::from_error(e, SAVE_FAILED),
        Err(e) => ApiResponse::from_error(e, "Internal server error"),
    }
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> ApiResponse<UploadResponse> {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiResponse::error(StatusCode::PAYLOAD_TOO_LARGE, "File too large.")
    } else {
        tracing::debug!(error = %e, "Malformed multipart upload");
        ApiResponse::error(StatusCode::BAD_REQUEST, "Invalid multipart request.")
    }
}

/// `GET /pdf/{sourceId}`
///
/// Streams a stored PDF back by local id.
#[utoipa::path(
    get,
    path = "/pdf/{sourceId}",
    tag = "documents",
    operation_id = "documents.get",
    params(("sourceId" = String, Path, description = "Local id returned as `yourSourceId`")),
    responses(
        (status = 200, description = "The stored PDF", content_type = "application/pdf", body = Vec<u8>),
        (status = 404, description = "No PDF stored under this id", body = ApiError),
    )
)]
pub async fn get_pdf(State(state): State<AppState>, Path(source_id): Path<String>) -> Response {
    match open_pdf(&state, &source_id).await {
        Ok(opened) => pdf_response(opened),
        Err(e) => ApiResponse::<()>::from_error(e, "Failed to read the PDF file.").into_response(),
    }
}

async fn open_pdf(state: &AppState, source_id: &str) -> Result<OpenedDocument> {
    let not_found = || AskPdfError::NotFound(PDF_NOT_FOUND.to_string());

    let local_id: LocalId = source_id.parse().map_err(|_| not_found())?;
    state.store.open(&local_id).await?.ok_or_else(not_found)
}

fn pdf_response(opened: OpenedDocument) -> Response {
    let file_name = opened.document.local_id.file_name();

    let mut response = Response::new(Body::from_stream(ReaderStream::new(opened.file)));
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/pdf"),
    );
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(opened.len));
    if let Ok(disposition) = HeaderValue::from_str(&format!("inline; filename=\"{file_name}\"")) {
        headers.insert(header::CONTENT_DISPOSITION, disposition);
    }

    response
}
