//! The trained artifact set served as one unit.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::encoder::RiskLabelEncoder;
use super::errors::ModelError;
use super::forest::{MultiOutputRegressor, RandomForestClassifier};

/// Storage key of one artifact blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKey {
    RiskModel,
    CategoryModel,
    RiskEncoder,
}

impl ArtifactKey {
    pub const ALL: [ArtifactKey; 3] = [
        ArtifactKey::RiskModel,
        ArtifactKey::CategoryModel,
        ArtifactKey::RiskEncoder,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKey::RiskModel => "risk_model",
            ArtifactKey::CategoryModel => "category_model",
            ArtifactKey::RiskEncoder => "risk_encoder",
        }
    }
}

impl fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Risk classifier, category regressor, and label encoder.
///
/// Immutable once built; the serving slot swaps whole sets.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelArtifacts {
    risk_model: RandomForestClassifier,
    category_model: MultiOutputRegressor,
    risk_encoder: RiskLabelEncoder,
}

impl ModelArtifacts {
    /// Bundles fitted models, checking they agree on shape.
    pub fn new(
        risk_model: RandomForestClassifier,
        category_model: MultiOutputRegressor,
        risk_encoder: RiskLabelEncoder,
    ) -> Result<Self, ModelError> {
        if risk_model.n_classes() != risk_encoder.n_classes() {
            return Err(ModelError::inconsistent(format!(
                "classifier has {} classes, encoder has {}",
                risk_model.n_classes(),
                risk_encoder.n_classes()
            )));
        }
        if risk_model.n_features() != category_model.n_features() {
            return Err(ModelError::inconsistent(format!(
                "classifier expects {} features, regressor expects {}",
                risk_model.n_features(),
                category_model.n_features()
            )));
        }
        Ok(Self {
            risk_model,
            category_model,
            risk_encoder,
        })
    }

    pub fn risk_model(&self) -> &RandomForestClassifier {
        &self.risk_model
    }

    pub fn category_model(&self) -> &MultiOutputRegressor {
        &self.category_model
    }

    pub fn risk_encoder(&self) -> &RiskLabelEncoder {
        &self.risk_encoder
    }

    /// Width of the feature vectors the models accept.
    pub fn feature_count(&self) -> usize {
        self.risk_model.n_features()
    }

    /// Number of category scores the regressor produces.
    pub fn category_count(&self) -> usize {
        self.category_model.n_outputs()
    }

    /// Serializes each artifact to its own JSON blob.
    pub fn to_blobs(&self) -> Result<Vec<(ArtifactKey, Vec<u8>)>, ModelError> {
        Ok(vec![
            (ArtifactKey::RiskModel, serde_json::to_vec(&self.risk_model)?),
            (
                ArtifactKey::CategoryModel,
                serde_json::to_vec(&self.category_model)?,
            ),
            (
                ArtifactKey::RiskEncoder,
                serde_json::to_vec(&self.risk_encoder)?,
            ),
        ])
    }

    /// Rebuilds an artifact set from the three stored blobs.
    pub fn from_blobs(
        risk_model: &[u8],
        category_model: &[u8],
        risk_encoder: &[u8],
    ) -> Result<Self, ModelError> {
        Self::new(
            serde_json::from_slice(risk_model)?,
            serde_json::from_slice(category_model)?,
            serde_json::from_slice(risk_encoder)?,
        )
    }
}
