//! Client Module
//!
//! HTTP client for a running askpdf server, the session model shared with
//! the browser UI, and the interactive terminal front end built on both.

mod http;
mod session;
mod terminal;

pub use http::AskPdfClient;
pub use session::{ChatSession, SessionDocument, SessionEvent};
pub use terminal::run_terminal;

use thiserror::Error;

/// Errors that can occur when talking to an askpdf server
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid server URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Connection failed: {0}")]
    ConnectionFailed(#[from] reqwest::Error),

    #[error("Server returned {status}: {message}")]
    Server { status: u16, message: String },

    #[error("No document uploaded yet")]
    NoDocument,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
