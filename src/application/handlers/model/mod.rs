//! Model lifecycle handlers.
//!
//! Training a new artifact set and restoring a persisted one.

mod load_models;
mod train_models;

pub use load_models::{LoadModelsError, LoadModelsHandler, LoadOutcome};
pub use train_models::{
    LabelDistribution, TrainModelsCommand, TrainModelsHandler, TrainingError, TrainingOptions,
    TrainingSummary,
};
