//! TrainModelsHandler - Command handler for the batch training pipeline.
//!
//! 1. Load the catalog and the observed couples
//! 2. Keep couples with enough answers, conform and label them
//! 3. Generate a synthetic population (patterned or generic)
//! 4. Attach synthetic dynamics and fit the artifact set
//! 5. Publish to the registry, then persist through the model store

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::application::ModelRegistry;
use crate::domain::analysis::{FeatureAssembler, RiskLevel, OBSERVED_RISK_THRESHOLDS};
use crate::domain::catalog::Catalog;
use crate::domain::couple::CoupleProfile;
use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};
use crate::domain::model::{FitMetrics, ForestParams, ModelArtifacts, ModelError, ModelTrainer};
use crate::domain::synthetic::{LabeledCouple, PopulationSource, SyntheticGenerator, TrainingSample};
use crate::ports::{
    CatalogError, CatalogReader, CoupleRecord, CoupleStoreError, CoupleStoreReader, ModelStore,
};

/// Tunables for one training run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainingOptions {
    /// Forest parameters; `forest.seed` also seeds population generation.
    pub forest: ForestParams,
    pub synthetic_sample_count: usize,
    /// Observed couples with fewer answers are ignored.
    pub min_observed_responses: usize,
    /// Also train on the observed couples themselves.
    pub include_observed: bool,
}

impl Default for TrainingOptions {
    fn default() -> Self {
        Self {
            forest: ForestParams::default(),
            synthetic_sample_count: 500,
            min_observed_responses: 50,
            include_observed: false,
        }
    }
}

/// Command to train and publish a new artifact set.
#[derive(Debug, Clone, Default)]
pub struct TrainModelsCommand {
    /// Overrides the configured synthetic sample count.
    pub sample_count: Option<usize>,
}

/// Risk label counts in the training set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LabelDistribution {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

impl LabelDistribution {
    fn count<'a>(couples: impl IntoIterator<Item = &'a LabeledCouple>) -> Self {
        couples
            .into_iter()
            .fold(Self::default(), |mut acc, c| {
                match c.risk_level {
                    RiskLevel::Low => acc.low += 1,
                    RiskLevel::Medium => acc.medium += 1,
                    RiskLevel::High => acc.high += 1,
                }
                acc
            })
    }
}

/// Result of a successful training run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingSummary {
    pub sample_count: usize,
    pub feature_count: usize,
    pub category_count: usize,
    pub source: PopulationSource,
    /// Observed couples that passed the answer-count filter.
    pub observed_couples: usize,
    pub labels: LabelDistribution,
    pub metrics: FitMetrics,
    /// False when publishing succeeded but the model store rejected the blobs.
    pub persisted: bool,
}

/// Errors that abort a training run. The registry is untouched on error.
#[derive(Debug, Error)]
pub enum TrainingError {
    #[error("No training samples: no observed couples and a synthetic sample count of 0")]
    EmptyTrainingSet,

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    CoupleStore(#[from] CoupleStoreError),

    #[error("Synthetic population could not be built: {0}")]
    Population(#[from] ValidationError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl TrainingError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            TrainingError::EmptyTrainingSet => ErrorCode::EmptyTrainingSet,
            TrainingError::Catalog(e) => e.code(),
            TrainingError::CoupleStore(e) => e.code(),
            TrainingError::Population(_) => ErrorCode::ValidationFailed,
            TrainingError::Model(e) => e.code(),
        }
    }
}

impl From<TrainingError> for DomainError {
    fn from(err: TrainingError) -> Self {
        DomainError::new(err.code(), err.to_string())
    }
}

/// Handler for training runs.
pub struct TrainModelsHandler {
    catalog_reader: Arc<dyn CatalogReader>,
    couple_store: Arc<dyn CoupleStoreReader>,
    model_store: Arc<dyn ModelStore>,
    registry: Arc<ModelRegistry>,
    options: TrainingOptions,
}

impl TrainModelsHandler {
    pub fn new(
        catalog_reader: Arc<dyn CatalogReader>,
        couple_store: Arc<dyn CoupleStoreReader>,
        model_store: Arc<dyn ModelStore>,
        registry: Arc<ModelRegistry>,
        options: TrainingOptions,
    ) -> Self {
        Self {
            catalog_reader,
            couple_store,
            model_store,
            registry,
            options,
        }
    }

    pub async fn handle(&self, cmd: TrainModelsCommand) -> Result<TrainingSummary, TrainingError> {
        // 1. Load inputs
        let catalog = self.catalog_reader.load_catalog().await?;
        let records = self.couple_store.list_couples().await?;
        let observed = self.observed_couples(&records, &catalog);

        // 2. Build the population
        let count = cmd.sample_count.unwrap_or(self.options.synthetic_sample_count);
        let mut rng = StdRng::seed_from_u64(self.options.forest.seed);
        let population = SyntheticGenerator::new(&catalog).generate(count, &observed, &mut rng)?;

        let mut couples = population.couples;
        if self.options.include_observed {
            couples.extend(observed.iter().cloned());
        }
        if couples.is_empty() {
            return Err(TrainingError::EmptyTrainingSet);
        }
        let labels = LabelDistribution::count(&couples);

        let samples: Vec<TrainingSample> = couples
            .into_iter()
            .map(|c| TrainingSample::with_synthetic_dynamics(c, &mut rng))
            .collect();

        // 3. Fit
        let assembler = FeatureAssembler::for_catalog(&catalog, 0);
        let outcome = ModelTrainer::new(self.options.forest).train(&samples, &assembler)?;

        info!(
            samples = samples.len(),
            source = ?population.source,
            observed = observed.len(),
            low = labels.low,
            medium = labels.medium,
            high = labels.high,
            risk_accuracy = outcome.metrics.risk_accuracy,
            category_mse = outcome.metrics.category_mse,
            "Models trained"
        );

        // 4. Publish, then persist
        let artifacts = self.registry.publish(outcome.artifacts).await;
        let persisted = self.persist(&artifacts).await;

        Ok(TrainingSummary {
            sample_count: samples.len(),
            feature_count: artifacts.feature_count(),
            category_count: artifacts.category_count(),
            source: population.source,
            observed_couples: observed.len(),
            labels,
            metrics: outcome.metrics,
            persisted,
        })
    }

    /// Observed couples with enough answers, resized to the catalog and labelled.
    fn observed_couples(&self, records: &[CoupleRecord], catalog: &Catalog) -> Vec<LabeledCouple> {
        let mut couples = Vec::new();
        for record in records {
            if record.answers.len() < self.options.min_observed_responses {
                continue;
            }
            let profile = match CoupleProfile::new(record.profile_input()) {
                Ok(profile) => profile,
                Err(err) => {
                    warn!(
                        couple_id = record.couple_id.as_deref().unwrap_or("-"),
                        error = %err,
                        "Skipping observed couple with invalid profile"
                    );
                    continue;
                }
            };
            let (responses, repair) = match record
                .responses()
                .conform(catalog.question_count(), usize::MAX)
            {
                Ok(conformed) => conformed,
                Err(err) => {
                    warn!(error = %err, "Skipping observed couple with unusable answers");
                    continue;
                }
            };
            if let Some(repair) = repair {
                debug!(
                    couple_id = record.couple_id.as_deref().unwrap_or("-"),
                    repair = ?repair,
                    "Observed answers resized to catalog length"
                );
            }
            couples.push(LabeledCouple::label(
                profile,
                responses,
                catalog,
                &OBSERVED_RISK_THRESHOLDS,
            ));
        }
        debug!(
            total = records.len(),
            kept = couples.len(),
            min_answers = self.options.min_observed_responses,
            "Observed couples filtered"
        );
        couples
    }

    async fn persist(&self, artifacts: &ModelArtifacts) -> bool {
        let blobs = match artifacts.to_blobs() {
            Ok(blobs) => blobs,
            Err(err) => {
                warn!(error = %err, "Model artifacts could not be serialized, not persisted");
                return false;
            }
        };
        for (key, blob) in blobs {
            if let Err(err) = self.model_store.save(key, &blob).await {
                warn!(key = %key, error = %err, "Model artifact not persisted");
                return false;
            }
        }
        true
    }
}
