//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `MEAI_COUNSEL` prefix and nested values use double underscores as separators.
//! Every value has a default, so an empty environment is a valid configuration.
//!
//! # Example
//!
//! ```no_run
//! use meai_counsel::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Training with seed {}", config.training.seed);
//! ```

mod error;
mod logging;
mod storage;
mod training;

pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;
pub use storage::{CatalogConfig, DataConfig, StorageConfig};
pub use training::TrainingConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Training pipeline (seed, population size, forest shape)
    #[serde(default)]
    pub training: TrainingConfig,

    /// Model blob persistence
    #[serde(default)]
    pub storage: StorageConfig,

    /// Question catalog source
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Observed couple records
    #[serde(default)]
    pub data: DataConfig,

    /// Log filter and format
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `MEAI_COUNSEL` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `MEAI_COUNSEL__TRAINING__SEED=7` -> `training.seed = 7`
    /// - `MEAI_COUNSEL__STORAGE__MODEL_DIRECTORY=/var/lib/meai` -> `storage.model_directory`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("MEAI_COUNSEL")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.training.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::path::PathBuf;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "MEAI_COUNSEL__TRAINING__SEED",
        "MEAI_COUNSEL__TRAINING__N_ESTIMATORS",
        "MEAI_COUNSEL__TRAINING__INCLUDE_OBSERVED",
        "MEAI_COUNSEL__STORAGE__MODEL_DIRECTORY",
        "MEAI_COUNSEL__CATALOG__PATH",
        "MEAI_COUNSEL__LOGGING__JSON",
    ];

    /// Helper to clear environment variables after testing
    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_with_empty_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.training.seed, 42);
        assert_eq!(config.storage.model_directory, PathBuf::from("./data/models"));
        assert!(config.catalog.path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("MEAI_COUNSEL__TRAINING__SEED", "7");
        env::set_var("MEAI_COUNSEL__TRAINING__N_ESTIMATORS", "25");
        env::set_var("MEAI_COUNSEL__TRAINING__INCLUDE_OBSERVED", "true");
        env::set_var("MEAI_COUNSEL__STORAGE__MODEL_DIRECTORY", "/tmp/meai-models");
        env::set_var("MEAI_COUNSEL__CATALOG__PATH", "/etc/meai/catalog.yaml");
        env::set_var("MEAI_COUNSEL__LOGGING__JSON", "true");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.training.seed, 7);
        assert_eq!(config.training.n_estimators, 25);
        assert!(config.training.include_observed);
        assert_eq!(config.storage.model_directory, PathBuf::from("/tmp/meai-models"));
        assert_eq!(
            config.catalog.path,
            Some(PathBuf::from("/etc/meai/catalog.yaml"))
        );
        assert!(config.logging.json);
    }

    #[test]
    fn test_invalid_training_config_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("MEAI_COUNSEL__TRAINING__N_ESTIMATORS", "0");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.validate().is_err());
    }
}
