//! Analysis handlers.
//!
//! Query-side handlers that run the served models on a couple.

mod analyze_couple;

pub use analyze_couple::{
    AnalysisError, AnalysisReport, AnalysisRequest, AnalyzeCoupleCommand, AnalyzeCoupleHandler,
    CategoryScore, DataQuality,
};
