//! Narrative Generator Port - Recommendation text for an analysed couple.
//!
//! Implementations range from the built-in rule-based narrator to external
//! language-generation services. External generators are always wrapped in
//! `FallbackNarrativeGenerator`, so their errors never reach callers.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::recommendation::RecommendationContext;

/// Errors from a narrative generator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NarrativeError {
    /// The generator cannot be reached or is not configured.
    #[error("narrative generator unavailable: {0}")]
    Unavailable(String),

    /// The generator was reached but produced no usable output.
    #[error("narrative generation failed: {0}")]
    Failed(String),
}

impl NarrativeError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        NarrativeError::Unavailable(message.into())
    }

    pub fn failed(message: impl Into<String>) -> Self {
        NarrativeError::Failed(message.into())
    }
}

impl From<NarrativeError> for DomainError {
    fn from(err: NarrativeError) -> Self {
        DomainError::new(ErrorCode::NarrativeGeneratorUnavailable, err.to_string())
    }
}

/// Port for producing recommendation text
#[async_trait]
pub trait NarrativeGenerator: Send + Sync {
    /// Produce recommendations for one couple, most important first
    async fn generate(&self, context: &RecommendationContext)
        -> Result<Vec<String>, NarrativeError>;

    /// Short name used in logs
    fn name(&self) -> &str;
}
