use std::sync::Arc;

use tracing::debug;

use crate::error::{AskPdfError, Result};
use crate::models::{ChatHistory, ChatTurn, ProviderSource};
use crate::provider::DocumentQaProvider;

pub const EMPTY_SOURCE_ID: &str = "chatPdfSourceId cannot be empty.";
pub const EMPTY_QUERY: &str = "Query cannot be empty.";

#[derive(Clone)]
pub struct ChatService {
    provider: Arc<dyn DocumentQaProvider>,
}

impl ChatService {
    pub fn new(provider: Arc<dyn DocumentQaProvider>) -> Self {
        Self { provider }
    }

    /// Ask one question about a provider source. The query is sent as a
    /// single-message conversation; earlier turns are not replayed.
    pub async fn ask(&self, source: &ProviderSource, query: &str) -> Result<String> {
        if source.provider_id.trim().is_empty() {
            return Err(AskPdfError::Validation(EMPTY_SOURCE_ID.to_string()));
        }
        if query.trim().is_empty() {
            return Err(AskPdfError::Validation(EMPTY_QUERY.to_string()));
        }

        debug!(provider_id = %source.provider_id, "Forwarding chat query");
        self.provider.chat(source, &[ChatTurn::user(query)]).await
    }

    pub async fn history(&self, source: &ProviderSource) -> Result<ChatHistory> {
        self.provider.history(source).await
    }

    pub fn provider_endpoint(&self) -> &str {
        self.provider.endpoint()
    }
}
