//! Model trainer - Fits the artifact set on labelled samples.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::analysis::{feature_count, FeatureAssembler};
use crate::domain::synthetic::TrainingSample;

use super::artifacts::ModelArtifacts;
use super::encoder::RiskLabelEncoder;
use super::errors::ModelError;
use super::forest::{ForestParams, MultiOutputRegressor, RandomForestClassifier};

/// In-sample fit quality.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitMetrics {
    /// Fraction of samples whose risk class is predicted correctly.
    pub risk_accuracy: f64,
    /// Mean squared error over all category scores.
    pub category_mse: f64,
}

/// A freshly fitted artifact set and how well it fits its training data.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingOutcome {
    pub artifacts: ModelArtifacts,
    pub metrics: FitMetrics,
}

/// Fits the risk classifier, category regressor, and label encoder.
pub struct ModelTrainer {
    params: ForestParams,
}

impl ModelTrainer {
    pub fn new(params: ForestParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ForestParams {
        &self.params
    }

    /// Trains on `samples`, building feature vectors with `assembler`.
    ///
    /// # Errors
    ///
    /// - `EmptyDataSet` when there are no samples
    /// - `FeatureCountMismatch` when a sample does not fit the catalog
    pub fn train(
        &self,
        samples: &[TrainingSample],
        assembler: &FeatureAssembler,
    ) -> Result<TrainingOutcome, ModelError> {
        if samples.is_empty() {
            return Err(ModelError::EmptyDataSet);
        }

        let encoder = RiskLabelEncoder::fit();
        let mut rows = Vec::with_capacity(samples.len());
        let mut labels = Vec::with_capacity(samples.len());
        let mut targets = Vec::with_capacity(samples.len());

        for sample in samples {
            let assembled = assembler
                .assemble(
                    &sample.couple.profile,
                    sample.couple.responses.clone(),
                    &sample.dynamics,
                )
                .map_err(|e| ModelError::FeatureCountMismatch {
                    expected: feature_count(e.expected),
                    actual: feature_count(e.actual),
                })?;
            rows.push(assembled.vector.into_inner());
            labels.push(encoder.encode(sample.couple.risk_level)?);
            targets.push(sample.couple.category_scores.clone());
        }

        debug!(
            samples = rows.len(),
            features = assembler.feature_count(),
            n_estimators = self.params.n_estimators,
            "Fitting risk classifier and category regressor"
        );

        let risk_model =
            RandomForestClassifier::fit(&rows, &labels, encoder.n_classes(), &self.params)?;
        let category_model = MultiOutputRegressor::fit(&rows, &targets, &self.params)?;
        let artifacts = ModelArtifacts::new(risk_model, category_model, encoder)?;

        let metrics = in_sample_metrics(&artifacts, &rows, &labels, &targets)?;
        Ok(TrainingOutcome { artifacts, metrics })
    }
}

fn in_sample_metrics(
    artifacts: &ModelArtifacts,
    rows: &[Vec<f64>],
    labels: &[usize],
    targets: &[Vec<f64>],
) -> Result<FitMetrics, ModelError> {
    let mut correct = 0usize;
    let mut squared_error = 0.0;
    let mut outputs = 0usize;

    for ((row, &label), target) in rows.iter().zip(labels).zip(targets) {
        if artifacts.risk_model().predict(row)? == label {
            correct += 1;
        }
        let predicted = artifacts.category_model().predict(row)?;
        for (p, t) in predicted.iter().zip(target) {
            squared_error += (p - t).powi(2);
            outputs += 1;
        }
    }

    Ok(FitMetrics {
        risk_accuracy: correct as f64 / rows.len().max(1) as f64,
        category_mse: squared_error / outputs.max(1) as f64,
    })
}
