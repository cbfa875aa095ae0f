//! Storage and data source configuration

use serde::Deserialize;
use std::path::PathBuf;

/// Where trained models are persisted
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_model_directory")]
    pub model_directory: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            model_directory: default_model_directory(),
        }
    }
}

fn default_model_directory() -> PathBuf {
    PathBuf::from("./data/models")
}

/// Question catalog source; the built-in catalog is used when unset
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Observed couple records; training uses generic synthetic data when unset
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataConfig {
    #[serde(default)]
    pub couples_path: Option<PathBuf>,
}
