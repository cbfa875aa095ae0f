//! Fallback Narrative Generator - Wrapper that always yields recommendations.
//!
//! When an external generator is configured it is tried first. If it is
//! absent, fails, or returns nothing, the fallback generator runs on the
//! same context instead. The fallback defaults to the rule-based generator,
//! and the rule-based narrator remains the floor if a replaced fallback
//! fails as well.
//!
//! # Example
//!
//! ```ignore
//! let generator = FallbackNarrativeGenerator::new()
//!     .with_primary(Arc::new(external_generator));
//!
//! let recommendations = generator.recommend(&context).await;
//! ```

use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

use super::RuleBasedNarrativeGenerator;
use crate::domain::recommendation::{RecommendationContext, RuleBasedNarrator, MAX_RECOMMENDATIONS};
use crate::ports::{NarrativeError, NarrativeGenerator};

/// Narrative generator with failover to a secondary generator.
#[derive(Clone)]
pub struct FallbackNarrativeGenerator {
    primary: Option<Arc<dyn NarrativeGenerator>>,
    fallback: Arc<dyn NarrativeGenerator>,
}

impl Default for FallbackNarrativeGenerator {
    fn default() -> Self {
        Self {
            primary: None,
            fallback: Arc::new(RuleBasedNarrativeGenerator),
        }
    }
}

impl FallbackNarrativeGenerator {
    /// Creates a generator that only uses the rule-based generator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an external generator to try first.
    pub fn with_primary(mut self, primary: Arc<dyn NarrativeGenerator>) -> Self {
        self.primary = Some(primary);
        self
    }

    /// Replaces the generator used when the primary is absent or unusable.
    pub fn with_fallback(mut self, fallback: Arc<dyn NarrativeGenerator>) -> Self {
        self.fallback = fallback;
        self
    }

    /// Recommendations for `context`, capped at `MAX_RECOMMENDATIONS`.
    pub async fn recommend(&self, context: &RecommendationContext) -> Vec<String> {
        if let Some(primary) = &self.primary {
            if let Some(recommendations) = Self::attempt(primary.as_ref(), context).await {
                return recommendations;
            }
        }

        match Self::attempt(self.fallback.as_ref(), context).await {
            Some(recommendations) => recommendations,
            None => RuleBasedNarrator::generate(context),
        }
    }

    async fn attempt(
        generator: &dyn NarrativeGenerator,
        context: &RecommendationContext,
    ) -> Option<Vec<String>> {
        match generator.generate(context).await {
            Ok(mut recommendations) if !recommendations.is_empty() => {
                recommendations.truncate(MAX_RECOMMENDATIONS);
                Some(recommendations)
            }
            Ok(_) => {
                warn!(
                    generator = generator.name(),
                    "Narrative generator returned no recommendations"
                );
                None
            }
            Err(err) => {
                warn!(
                    generator = generator.name(),
                    error = %err,
                    "Narrative generator failed"
                );
                None
            }
        }
    }
}

#[async_trait]
impl NarrativeGenerator for FallbackNarrativeGenerator {
    async fn generate(
        &self,
        context: &RecommendationContext,
    ) -> Result<Vec<String>, NarrativeError> {
        Ok(self.recommend(context).await)
    }

    fn name(&self) -> &str {
        self.primary
            .as_ref()
            .map_or_else(|| self.fallback.name(), |p| p.name())
    }
}
