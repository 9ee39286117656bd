//! Document QA provider seam.
//!
//! All question answering happens at the provider; this crate only hands it
//! files and questions. [`ChatPdfClient`] talks to the ChatPDF HTTP API.

mod api;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{ChatHistory, ChatTurn, ProviderSource};

pub use api::ChatPdfClient;

#[async_trait]
pub trait DocumentQaProvider: Send + Sync {
    /// Register a file with the provider and return its source handle.
    async fn add_file(&self, bytes: &[u8], file_name: &str) -> Result<ProviderSource>;

    /// Send a conversation scoped to `source` and return the generated reply.
    async fn chat(&self, source: &ProviderSource, messages: &[ChatTurn]) -> Result<String>;

    /// Prior turns the provider retains for `source`. Providers without a
    /// history operation report an empty history.
    async fn history(&self, _source: &ProviderSource) -> Result<ChatHistory> {
        Ok(ChatHistory::default())
    }

    /// Base URL requests are sent to, for diagnostics.
    fn endpoint(&self) -> &str;
}
