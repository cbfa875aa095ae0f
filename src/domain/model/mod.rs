//! Model module - Random forests and the served artifact set.
//!
//! # Components
//!
//! - `RandomForestClassifier` - Risk class over Low, Medium, High
//! - `MultiOutputRegressor` - One `RandomForestRegressor` per category
//! - `RiskLabelEncoder` - Class index to `RiskLevel`
//! - `ModelArtifacts` - The three, swapped as one unit
//! - `ModelTrainer` / `Predictor` - Fitting and serving

mod artifacts;
mod encoder;
mod errors;
mod forest;
mod predictor;
mod trainer;
mod tree;

pub use artifacts::{ArtifactKey, ModelArtifacts};
pub use encoder::RiskLabelEncoder;
pub use errors::ModelError;
pub use forest::{ForestParams, MultiOutputRegressor, RandomForestClassifier, RandomForestRegressor};
pub use predictor::{Prediction, Predictor};
pub use trainer::{FitMetrics, ModelTrainer, TrainingOutcome};
pub use tree::{DecisionTree, MaxFeatures, TreeParams};
