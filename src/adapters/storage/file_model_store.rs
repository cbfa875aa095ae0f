//! File-based Model Store Adapter
//!
//! Stores each model artifact as `<key>.json` inside one directory.
//! Writes go to a temporary file first and are renamed into place so a
//! reader never observes a half-written blob.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::domain::model::ArtifactKey;
use crate::ports::{ModelStore, ModelStoreError};

/// File-based storage for model blobs
#[derive(Debug, Clone)]
pub struct FileModelStore {
    base_path: PathBuf,
}

impl FileModelStore {
    /// Create a new file store rooted at `base_path`
    ///
    /// The directory is created on first save.
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Get the blob file path for a key
    fn blob_path(&self, key: ArtifactKey) -> PathBuf {
        self.base_path.join(format!("{}.json", key))
    }

    fn temp_path(&self, key: ArtifactKey) -> PathBuf {
        self.base_path.join(format!("{}.json.tmp", key))
    }
}

#[async_trait]
impl ModelStore for FileModelStore {
    async fn load(&self, key: ArtifactKey) -> Result<Option<Vec<u8>>, ModelStoreError> {
        match fs::read(self.blob_path(key)).await {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ModelStoreError::io(key, e)),
        }
    }

    async fn save(&self, key: ArtifactKey, blob: &[u8]) -> Result<(), ModelStoreError> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| ModelStoreError::io(key, e))?;

        let temp = self.temp_path(key);
        fs::write(&temp, blob)
            .await
            .map_err(|e| ModelStoreError::io(key, e))?;
        fs::rename(&temp, self.blob_path(key))
            .await
            .map_err(|e| ModelStoreError::io(key, e))?;

        debug!(key = %key, bytes = blob.len(), "Model blob written");
        Ok(())
    }
}
