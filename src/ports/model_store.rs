//! Model Store Port - Persistence for trained model blobs.
//!
//! Each artifact of the served set is stored under its own key. A missing
//! blob is a normal state (nothing trained yet) and is reported as `None`,
//! never as an error.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::model::ArtifactKey;

/// Errors that can occur during model storage operations
#[derive(Debug, thiserror::Error)]
pub enum ModelStoreError {
    #[error("IO error for {key}: {message}")]
    Io { key: ArtifactKey, message: String },

    #[error("Model store unavailable: {0}")]
    Unavailable(String),
}

impl ModelStoreError {
    pub fn io(key: ArtifactKey, err: impl std::fmt::Display) -> Self {
        ModelStoreError::Io {
            key,
            message: err.to_string(),
        }
    }
}

impl From<ModelStoreError> for DomainError {
    fn from(err: ModelStoreError) -> Self {
        DomainError::new(ErrorCode::StorageError, err.to_string())
    }
}

/// Port for persisting and loading model blobs
#[async_trait]
pub trait ModelStore: Send + Sync {
    /// Load the blob stored under `key`
    ///
    /// # Returns
    /// `None` when nothing has been stored under the key
    async fn load(&self, key: ArtifactKey) -> Result<Option<Vec<u8>>, ModelStoreError>;

    /// Store `blob` under `key`, replacing any previous blob
    async fn save(&self, key: ArtifactKey, blob: &[u8]) -> Result<(), ModelStoreError>;
}
