//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Training is the only write path; analysis reads a snapshot of the
//! `ModelRegistry`.

pub mod handlers;
mod model_registry;

pub use handlers::{
    // Analysis
    AnalysisError, AnalysisReport, AnalysisRequest, AnalyzeCoupleCommand, AnalyzeCoupleHandler,
    CategoryScore, DataQuality,
    // Model lifecycle
    LabelDistribution, LoadModelsError, LoadModelsHandler, LoadOutcome, TrainModelsCommand,
    TrainModelsHandler, TrainingError, TrainingOptions, TrainingSummary,
};
pub use model_registry::{ModelRegistry, ModelStatus};
