//! ModelRegistry - The single serving slot for trained models.
//!
//! Readers take an `Arc` snapshot per request and keep using it even if
//! training publishes a new set meanwhile. Publishing replaces the whole
//! artifact set in one write, so a reader never sees a mix of old and new
//! artifacts.

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::domain::model::ModelArtifacts;

/// What the registry is currently serving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelStatus {
    pub loaded: bool,
    pub feature_count: Option<usize>,
    pub category_count: Option<usize>,
}

#[derive(Debug, Default)]
pub struct ModelRegistry {
    slot: RwLock<Option<Arc<ModelArtifacts>>>,
}

impl ModelRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The artifact set being served, if any.
    pub async fn snapshot(&self) -> Option<Arc<ModelArtifacts>> {
        self.slot.read().await.clone()
    }

    /// Replaces the served artifact set.
    pub async fn publish(&self, artifacts: ModelArtifacts) -> Arc<ModelArtifacts> {
        let artifacts = Arc::new(artifacts);
        let previous = self.slot.write().await.replace(Arc::clone(&artifacts));
        info!(
            features = artifacts.feature_count(),
            categories = artifacts.category_count(),
            replaced = previous.is_some(),
            "Model artifacts published"
        );
        artifacts
    }

    pub async fn is_loaded(&self) -> bool {
        self.slot.read().await.is_some()
    }

    pub async fn status(&self) -> ModelStatus {
        let slot = self.slot.read().await;
        ModelStatus {
            loaded: slot.is_some(),
            feature_count: slot.as_ref().map(|a| a.feature_count()),
            category_count: slot.as_ref().map(|a| a.category_count()),
        }
    }
}
