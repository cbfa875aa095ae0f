//! LoadModelsHandler - Restores persisted artifacts into the registry.

use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::application::ModelRegistry;
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::model::{ArtifactKey, ModelArtifacts, ModelError};
use crate::ports::{ModelStore, ModelStoreError};

/// Outcome of a load attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoadOutcome {
    Loaded {
        feature_count: usize,
        category_count: usize,
    },
    /// At least one blob is absent; nothing was published.
    NotTrained { missing: Vec<ArtifactKey> },
}

#[derive(Debug, Error)]
pub enum LoadModelsError {
    #[error(transparent)]
    Store(#[from] ModelStoreError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl From<LoadModelsError> for DomainError {
    fn from(err: LoadModelsError) -> Self {
        let code = match &err {
            LoadModelsError::Store(_) => ErrorCode::StorageError,
            LoadModelsError::Model(e) => e.code(),
        };
        DomainError::new(code, err.to_string())
    }
}

pub struct LoadModelsHandler {
    model_store: Arc<dyn ModelStore>,
    registry: Arc<ModelRegistry>,
}

impl LoadModelsHandler {
    pub fn new(model_store: Arc<dyn ModelStore>, registry: Arc<ModelRegistry>) -> Self {
        Self {
            model_store,
            registry,
        }
    }

    pub async fn handle(&self) -> Result<LoadOutcome, LoadModelsError> {
        let risk_model = self.model_store.load(ArtifactKey::RiskModel).await?;
        let category_model = self.model_store.load(ArtifactKey::CategoryModel).await?;
        let risk_encoder = self.model_store.load(ArtifactKey::RiskEncoder).await?;

        let (Some(risk_model), Some(category_model), Some(risk_encoder)) =
            (&risk_model, &category_model, &risk_encoder)
        else {
            let missing: Vec<ArtifactKey> = [
                (ArtifactKey::RiskModel, risk_model.is_none()),
                (ArtifactKey::CategoryModel, category_model.is_none()),
                (ArtifactKey::RiskEncoder, risk_encoder.is_none()),
            ]
            .into_iter()
            .filter_map(|(key, absent)| absent.then_some(key))
            .collect();
            info!(?missing, "No complete persisted model set, serving nothing until trained");
            return Ok(LoadOutcome::NotTrained { missing });
        };

        let artifacts = ModelArtifacts::from_blobs(risk_model, category_model, risk_encoder)?;
        let artifacts = self.registry.publish(artifacts).await;

        Ok(LoadOutcome::Loaded {
            feature_count: artifacts.feature_count(),
            category_count: artifacts.category_count(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryModelStore;
    use crate::domain::model::{
        ForestParams, MultiOutputRegressor, RandomForestClassifier, RiskLabelEncoder,
    };

    fn artifacts() -> ModelArtifacts {
        let rows: Vec<Vec<f64>> = (0..9).map(|i| vec![i as f64, (i * i) as f64]).collect();
        let labels: Vec<usize> = (0..9).map(|i| i / 3).collect();
        let targets: Vec<Vec<f64>> = (0..9).map(|i| vec![i as f64 / 9.0]).collect();
        let params = ForestParams {
            n_estimators: 2,
            ..ForestParams::default()
        };
        ModelArtifacts::new(
            RandomForestClassifier::fit(&rows, &labels, 3, &params).unwrap(),
            MultiOutputRegressor::fit(&rows, &targets, &params).unwrap(),
            RiskLabelEncoder::fit(),
        )
        .unwrap()
    }

    async fn store_with(keys: &[ArtifactKey]) -> InMemoryModelStore {
        let store = InMemoryModelStore::new();
        for (key, blob) in artifacts().to_blobs().unwrap() {
            if keys.contains(&key) {
                store.save(key, &blob).await.unwrap();
            }
        }
        store
    }

    #[tokio::test]
    async fn complete_set_is_published() {
        let registry = Arc::new(ModelRegistry::new());
        let handler = LoadModelsHandler::new(
            Arc::new(store_with(&ArtifactKey::ALL).await),
            Arc::clone(&registry),
        );

        let outcome = handler.handle().await.unwrap();

        assert_eq!(
            outcome,
            LoadOutcome::Loaded {
                feature_count: 2,
                category_count: 1
            }
        );
        assert_eq!(*registry.snapshot().await.unwrap(), artifacts());
    }

    #[tokio::test]
    async fn empty_store_is_not_trained() {
        let registry = Arc::new(ModelRegistry::new());
        let handler =
            LoadModelsHandler::new(Arc::new(InMemoryModelStore::new()), Arc::clone(&registry));

        let outcome = handler.handle().await.unwrap();

        assert_eq!(
            outcome,
            LoadOutcome::NotTrained {
                missing: ArtifactKey::ALL.to_vec()
            }
        );
        assert!(!registry.is_loaded().await);
    }

    #[tokio::test]
    async fn partial_set_is_not_published() {
        let registry = Arc::new(ModelRegistry::new());
        let store = store_with(&[ArtifactKey::RiskModel, ArtifactKey::RiskEncoder]).await;
        let handler = LoadModelsHandler::new(Arc::new(store), Arc::clone(&registry));

        let outcome = handler.handle().await.unwrap();

        assert_eq!(
            outcome,
            LoadOutcome::NotTrained {
                missing: vec![ArtifactKey::CategoryModel]
            }
        );
        assert!(!registry.is_loaded().await);
    }

    #[tokio::test]
    async fn corrupt_blob_is_an_error() {
        let registry = Arc::new(ModelRegistry::new());
        let store = store_with(&ArtifactKey::ALL).await;
        store.save(ArtifactKey::RiskEncoder, b"not json").await.unwrap();
        let handler = LoadModelsHandler::new(Arc::new(store), Arc::clone(&registry));

        let err = handler.handle().await.unwrap_err();

        assert!(matches!(err, LoadModelsError::Model(ModelError::Serialization(_))));
        assert!(!registry.is_loaded().await);
    }
}
