//! In-Memory Model Store Adapter
//!
//! Stores model blobs in memory.
//! Useful for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::model::ArtifactKey;
use crate::ports::{ModelStore, ModelStoreError};

/// In-memory storage for model blobs
#[derive(Debug, Clone, Default)]
pub struct InMemoryModelStore {
    blobs: Arc<RwLock<HashMap<ArtifactKey, Vec<u8>>>>,
    fail_saves: bool,
}

impl InMemoryModelStore {
    /// Create a new, empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose saves always fail (for persistence-failure tests)
    pub fn failing() -> Self {
        Self {
            blobs: Arc::default(),
            fail_saves: true,
        }
    }

    /// Get the number of stored blobs
    pub async fn blob_count(&self) -> usize {
        self.blobs.read().await.len()
    }

    /// Clear all stored blobs
    pub async fn clear(&self) {
        self.blobs.write().await.clear();
    }
}

#[async_trait]
impl ModelStore for InMemoryModelStore {
    async fn load(&self, key: ArtifactKey) -> Result<Option<Vec<u8>>, ModelStoreError> {
        Ok(self.blobs.read().await.get(&key).cloned())
    }

    async fn save(&self, key: ArtifactKey, blob: &[u8]) -> Result<(), ModelStoreError> {
        if self.fail_saves {
            return Err(ModelStoreError::Unavailable(format!(
                "refusing to store {}",
                key
            )));
        }
        self.blobs.write().await.insert(key, blob.to_vec());
        Ok(())
    }
}
