//! Predictor - Turns raw model outputs into a risk class and focus categories.

use serde::{Deserialize, Serialize};

use crate::domain::analysis::{focus_categories, FeatureVector, FocusCategory, RiskLevel};
use crate::domain::catalog::Catalog;

use super::artifacts::ModelArtifacts;
use super::errors::ModelError;
use super::forest::argmax;

/// Model outputs for one couple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub risk_level: RiskLevel,
    /// Highest class probability, in [0, 1].
    pub confidence: f64,
    /// Category scores in catalog order, each in [0, 1].
    pub category_scores: Vec<f64>,
    /// Every category with its 3-tier priority, highest score first.
    pub focus_categories: Vec<FocusCategory>,
}

/// Runs the artifact set on a single feature vector. Deterministic.
pub struct Predictor;

impl Predictor {
    /// # Errors
    ///
    /// - `CatalogMismatch` when the catalog's category count differs from the model's
    /// - `FeatureCountMismatch` when the vector has the wrong width
    pub fn predict(
        artifacts: &ModelArtifacts,
        catalog: &Catalog,
        features: &FeatureVector,
    ) -> Result<Prediction, ModelError> {
        if catalog.category_count() != artifacts.category_count() {
            return Err(ModelError::CatalogMismatch {
                expected: artifacts.category_count(),
                actual: catalog.category_count(),
            });
        }

        let row = features.values();
        let proba = artifacts.risk_model().predict_proba(row)?;
        let risk_level = artifacts.risk_encoder().decode(argmax(&proba))?;
        let confidence = proba
            .iter()
            .copied()
            .fold(0.0, f64::max)
            .clamp(0.0, 1.0);

        let category_scores: Vec<f64> = artifacts
            .category_model()
            .predict(row)?
            .into_iter()
            .map(|s| s.clamp(0.0, 1.0))
            .collect();
        let focus_categories = focus_categories(catalog, &category_scores);

        Ok(Prediction {
            risk_level,
            confidence,
            category_scores,
            focus_categories,
        })
    }
}
