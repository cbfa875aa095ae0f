//! Training configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::application::TrainingOptions;
use crate::domain::model::ForestParams;

/// Training pipeline configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TrainingConfig {
    /// Seed for population generation and forest fitting
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Synthetic couples generated per training run
    #[serde(default = "default_synthetic_sample_count")]
    pub synthetic_sample_count: usize,

    /// Trees per forest
    #[serde(default = "default_n_estimators")]
    pub n_estimators: usize,

    /// Maximum tree depth (unbounded when unset)
    #[serde(default)]
    pub max_depth: Option<usize>,

    #[serde(default = "default_min_samples_split")]
    pub min_samples_split: usize,

    /// Observed couples need at least this many answers to be used
    #[serde(default = "default_min_observed_responses")]
    pub min_observed_responses: usize,

    /// Largest answer-count difference repaired at analysis time
    #[serde(default = "default_response_length_tolerance")]
    pub response_length_tolerance: usize,

    /// Also train on observed couples, not just on their synthetic variants
    #[serde(default)]
    pub include_observed: bool,
}

impl TrainingConfig {
    pub fn forest_params(&self) -> ForestParams {
        ForestParams {
            n_estimators: self.n_estimators,
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            seed: self.seed,
        }
    }

    /// Options for `TrainModelsHandler`
    pub fn options(&self) -> TrainingOptions {
        TrainingOptions {
            forest: self.forest_params(),
            synthetic_sample_count: self.synthetic_sample_count,
            min_observed_responses: self.min_observed_responses,
            include_observed: self.include_observed,
        }
    }

    /// Validate training configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.n_estimators == 0 {
            return Err(ValidationError::TooSmall("training.n_estimators", 1));
        }
        if self.min_samples_split < 2 {
            return Err(ValidationError::TooSmall("training.min_samples_split", 2));
        }
        if self.max_depth == Some(0) {
            return Err(ValidationError::TooSmall("training.max_depth", 1));
        }
        Ok(())
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            synthetic_sample_count: default_synthetic_sample_count(),
            n_estimators: default_n_estimators(),
            max_depth: None,
            min_samples_split: default_min_samples_split(),
            min_observed_responses: default_min_observed_responses(),
            response_length_tolerance: default_response_length_tolerance(),
            include_observed: false,
        }
    }
}

fn default_seed() -> u64 {
    42
}

fn default_synthetic_sample_count() -> usize {
    500
}

fn default_n_estimators() -> usize {
    100
}

fn default_min_samples_split() -> usize {
    2
}

fn default_min_observed_responses() -> usize {
    50
}

fn default_response_length_tolerance() -> usize {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_training_config_defaults() {
        let config = TrainingConfig::default();
        assert_eq!(config.seed, 42);
        assert_eq!(config.synthetic_sample_count, 500);
        assert_eq!(config.n_estimators, 100);
        assert_eq!(config.min_observed_responses, 50);
        assert!(!config.include_observed);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_forest_params_follow_config() {
        let config = TrainingConfig {
            seed: 7,
            n_estimators: 12,
            max_depth: Some(6),
            ..Default::default()
        };
        let params = config.forest_params();
        assert_eq!(params.seed, 7);
        assert_eq!(params.n_estimators, 12);
        assert_eq!(params.max_depth, Some(6));
        assert_eq!(config.options().forest, params);
    }

    #[test]
    fn test_validation_rejects_degenerate_forests() {
        let config = TrainingConfig {
            n_estimators: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = TrainingConfig {
            min_samples_split: 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = TrainingConfig {
            max_depth: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_training_config_deserialization() {
        let json = r#"{"seed": 9, "include_observed": true}"#;
        let config: TrainingConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.seed, 9);
        assert!(config.include_observed);
        assert_eq!(config.synthetic_sample_count, 500);
    }
}
