//! Local persistence for uploaded PDFs.
//!
//! Handlers and services only see the [`DocumentStore`] trait; the
//! filesystem-backed [`LocalStorage`] is the one implementation shipped.

mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{LocalId, StoredDocument};

pub use local::LocalStorage;

/// An opened stored PDF, ready to be streamed back to a client.
#[derive(Debug)]
pub struct OpenedDocument {
    pub document: StoredDocument,
    pub file: tokio::fs::File,
    pub len: u64,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Persist `bytes` under a freshly generated local id.
    async fn save(&self, bytes: &[u8]) -> Result<StoredDocument>;

    /// Open a stored document for reading. `Ok(None)` when nothing is stored
    /// under `id`.
    async fn open(&self, id: &LocalId) -> Result<Option<OpenedDocument>>;

    /// Remove a stored document. Returns whether a file was actually removed.
    async fn delete(&self, id: &LocalId) -> Result<bool>;
}
