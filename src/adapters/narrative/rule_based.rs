//! Rule-based narrative generator.

use async_trait::async_trait;

use crate::domain::recommendation::{RecommendationContext, RuleBasedNarrator};
use crate::ports::{NarrativeError, NarrativeGenerator};

/// Port adapter over `RuleBasedNarrator`. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedNarrativeGenerator;

#[async_trait]
impl NarrativeGenerator for RuleBasedNarrativeGenerator {
    async fn generate(
        &self,
        context: &RecommendationContext,
    ) -> Result<Vec<String>, NarrativeError> {
        Ok(RuleBasedNarrator::generate(context))
    }

    fn name(&self) -> &str {
        "rule-based"
    }
}
