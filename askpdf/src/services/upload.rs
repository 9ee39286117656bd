use std::sync::Arc;

use tracing::{info, warn};

use crate::error::Result;
use crate::models::UploadOutcome;
use crate::provider::DocumentQaProvider;
use crate::storage::DocumentStore;

/// Store-then-forward ingestion of an uploaded PDF.
///
/// Step one writes the bytes to local storage, step two registers them with
/// the provider. If step two fails the local copy is deleted again, so a
/// failed upload never leaves an orphaned file behind.
#[derive(Clone)]
pub struct UploadPipeline {
    store: Arc<dyn DocumentStore>,
    provider: Arc<dyn DocumentQaProvider>,
}

impl UploadPipeline {
    pub fn new(store: Arc<dyn DocumentStore>, provider: Arc<dyn DocumentQaProvider>) -> Self {
        Self { store, provider }
    }

    pub async fn ingest(&self, bytes: &[u8]) -> Result<UploadOutcome> {
        let document = self.store.save(bytes).await?;

        match self
            .provider
            .add_file(bytes, &document.local_id.file_name())
            .await
        {
            Ok(source) => {
                info!(
                    local_id = %document.local_id,
                    provider_id = %source.provider_id,
                    "PDF uploaded"
                );
                Ok(UploadOutcome { document, source })
            }
            Err(e) => {
                if let Err(cleanup) = self.store.delete(&document.local_id).await {
                    warn!(
                        local_id = %document.local_id,
                        error = %cleanup,
                        "Failed to remove local copy after provider failure"
                    );
                }
                Err(e)
            }
        }
    }
}
