use std::sync::Arc;

use crate::config::Config;
use crate::provider::DocumentQaProvider;
use crate::services::{ChatService, UploadPipeline};
use crate::storage::DocumentStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Upload directory, read by the file server.
    pub store: Arc<dyn DocumentStore>,
    pub uploads: UploadPipeline,
    pub chat: ChatService,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn DocumentStore>,
        provider: Arc<dyn DocumentQaProvider>,
    ) -> Self {
        let uploads = UploadPipeline::new(store.clone(), provider.clone());
        let chat = ChatService::new(provider);

        Self {
            config: Arc::new(config),
            store,
            uploads,
            chat,
        }
    }
}
