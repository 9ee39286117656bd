//! AskPDF: upload a PDF, read it in the browser, and ask questions about it.
//!
//! The server stores uploads on local disk and forwards files and questions
//! to a ChatPDF-compatible document QA provider. All answering happens at the
//! provider.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod provider;
pub mod services;
pub mod storage;

pub use api::{create_router, AppState};
pub use config::Config;
pub use error::{AskPdfError, Result};
