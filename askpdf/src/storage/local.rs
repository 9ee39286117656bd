use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::config::StorageConfig;
use crate::error::{AskPdfError, Result};
use crate::models::{LocalId, StoredDocument};

use super::{DocumentStore, OpenedDocument};

/// Attempts at finding an unused id before giving up. Collisions need two
/// uploads in the same millisecond drawing the same 6-character suffix.
const MAX_ID_ATTEMPTS: usize = 4;

/// Stores each PDF as `<upload_dir>/<local_id>-document.pdf`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(config.upload_dir.clone())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, id: &LocalId) -> PathBuf {
        self.root.join(id.file_name())
    }

    async fn write_new(&self, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await?;

        let written = async {
            file.write_all(bytes).await?;
            file.flush().await
        }
        .await;

        if let Err(e) = written {
            drop(file);
            if let Err(cleanup) = tokio::fs::remove_file(path).await {
                warn!(path = %path.display(), error = %cleanup, "Failed to remove partial upload");
            }
            return Err(e);
        }

        Ok(())
    }
}

#[async_trait]
impl DocumentStore for LocalStorage {
    async fn save(&self, bytes: &[u8]) -> Result<StoredDocument> {
        tokio::fs::create_dir_all(&self.root).await?;

        for _ in 0..MAX_ID_ATTEMPTS {
            let local_id = LocalId::generate();
            let file_path = self.path_for(&local_id);

            match self.write_new(&file_path, bytes).await {
                Ok(()) => {
                    debug!(id = %local_id, bytes = bytes.len(), "Stored uploaded PDF");
                    return Ok(StoredDocument {
                        local_id,
                        file_path,
                    });
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    debug!(id = %local_id, "Local id collision, regenerating");
                    continue;
                }
                Err(e) => return Err(AskPdfError::Storage(e)),
            }
        }

        Err(AskPdfError::Internal(format!(
            "Could not allocate a unique document id after {MAX_ID_ATTEMPTS} attempts"
        )))
    }

    async fn open(&self, id: &LocalId) -> Result<Option<OpenedDocument>> {
        let file_path = self.path_for(id);

        let file = match tokio::fs::File::open(&file_path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(AskPdfError::Storage(e)),
        };

        let metadata = file.metadata().await?;
        if !metadata.is_file() {
            return Ok(None);
        }

        Ok(Some(OpenedDocument {
            document: StoredDocument {
                local_id: id.clone(),
                file_path,
            },
            file,
            len: metadata.len(),
        }))
    }

    async fn delete(&self, id: &LocalId) -> Result<bool> {
        match tokio::fs::remove_file(self.path_for(id)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(AskPdfError::Storage(e)),
        }
    }
}
