//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod analysis;
pub mod model;

pub use analysis::{
    AnalysisError, AnalysisReport, AnalysisRequest, AnalyzeCoupleCommand, AnalyzeCoupleHandler,
    CategoryScore, DataQuality,
};
pub use model::{
    LabelDistribution, LoadModelsError, LoadModelsHandler, LoadOutcome, TrainModelsCommand,
    TrainModelsHandler, TrainingError, TrainingOptions, TrainingSummary,
};
