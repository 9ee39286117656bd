//! JSON body extraction with the API's `{ "error": ... }` contract.
//!
//! axum's own `Json` rejections answer in plain text with serde's wording.
//! [`JsonBody`] turns every rejection into an [`AskPdfError::Validation`]
//! whose message matches what the chat service reports for the same
//! mistake, so a missing `query` and an empty `query` read the same.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::Json;

use crate::error::AskPdfError;
use crate::services::{EMPTY_QUERY, EMPTY_SOURCE_ID};

const NOT_JSON: &str = "Request body is not valid JSON.";
const WRONG_SHAPE: &str = "Request body does not match the expected shape.";
const NOT_JSON_CONTENT_TYPE: &str = "Expected a request with Content-Type: application/json.";
const UNREADABLE_BODY: &str = "Could not read the request body.";

pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AskPdfError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(detail = %rejection.body_text(), "Rejected JSON body");
                Err(AskPdfError::Validation(rejection_message(&rejection)))
            }
        }
    }
}

fn rejection_message(rejection: &JsonRejection) -> String {
    match rejection {
        JsonRejection::JsonDataError(err) => match missing_field(&err.body_text()) {
            Some(field) => missing_field_message(field),
            None => WRONG_SHAPE.to_string(),
        },
        JsonRejection::JsonSyntaxError(_) => NOT_JSON.to_string(),
        JsonRejection::MissingJsonContentType(_) => NOT_JSON_CONTENT_TYPE.to_string(),
        _ => UNREADABLE_BODY.to_string(),
    }
}

/// A missing required field reads the same as an empty one.
fn missing_field_message(field: &str) -> String {
    match field {
        "query" => EMPTY_QUERY.to_string(),
        "chatPdfSourceId" => EMPTY_SOURCE_ID.to_string(),
        other => format!("Missing field: {other}."),
    }
}

/// Pulls the field name out of serde's "missing field `name`" message.
fn missing_field(message: &str) -> Option<&str> {
    let (_, rest) = message.split_once("missing field `")?;
    let (field, _) = rest.split_once('`')?;
    Some(field)
}
