//! Mock Narrative Generator for testing.
//!
//! Returns pre-configured outputs in order and records every context it
//! was called with.
//!
//! # Example
//!
//! ```ignore
//! let generator = MockNarrativeGenerator::new()
//!     .with_error(NarrativeError::unavailable("down"))
//!     .with_lines(vec!["Schedule a joint session".into()]);
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::recommendation::RecommendationContext;
use crate::ports::{NarrativeError, NarrativeGenerator};

/// A configured mock outcome.
#[derive(Debug, Clone)]
pub enum MockNarrative {
    Lines(Vec<String>),
    Error(NarrativeError),
}

/// Mock narrative generator, configurable per call.
#[derive(Debug, Clone, Default)]
pub struct MockNarrativeGenerator {
    /// Pre-configured outcomes (consumed in order).
    outcomes: Arc<Mutex<VecDeque<MockNarrative>>>,
    /// Call history for verification.
    calls: Arc<Mutex<Vec<RecommendationContext>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockNarrativeGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful output.
    pub fn with_lines(self, lines: Vec<String>) -> Self {
        lock(&self.outcomes).push_back(MockNarrative::Lines(lines));
        self
    }

    /// Queues an error.
    pub fn with_error(self, error: NarrativeError) -> Self {
        lock(&self.outcomes).push_back(MockNarrative::Error(error));
        self
    }

    /// Returns the number of calls made to this generator.
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Returns all recorded contexts.
    pub fn calls(&self) -> Vec<RecommendationContext> {
        lock(&self.calls).clone()
    }

    fn next_outcome(&self) -> MockNarrative {
        lock(&self.outcomes)
            .pop_front()
            .unwrap_or_else(|| MockNarrative::Lines(vec!["Mock recommendation".to_string()]))
    }
}

#[async_trait]
impl NarrativeGenerator for MockNarrativeGenerator {
    async fn generate(
        &self,
        context: &RecommendationContext,
    ) -> Result<Vec<String>, NarrativeError> {
        lock(&self.calls).push(context.clone());

        match self.next_outcome() {
            MockNarrative::Lines(lines) => Ok(lines),
            MockNarrative::Error(err) => Err(err),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analysis::{PersonalizedFeatures, RiskLevel};
    use crate::domain::couple::{CoupleProfile, CoupleProfileInput};

    fn context() -> RecommendationContext {
        RecommendationContext {
            risk_level: RiskLevel::Low,
            category_scores: vec![],
            focus_categories: vec![],
            dynamics: PersonalizedFeatures::default(),
            male_responses: vec![],
            female_responses: vec![],
            profile: CoupleProfile::new(CoupleProfileInput::default()).unwrap(),
        }
    }

    #[tokio::test]
    async fn outcomes_are_consumed_in_order() {
        let mock = MockNarrativeGenerator::new()
            .with_error(NarrativeError::failed("first"))
            .with_lines(vec!["second".into()]);

        assert!(mock.generate(&context()).await.is_err());
        assert_eq!(mock.generate(&context()).await.unwrap(), vec!["second"]);
        assert_eq!(
            mock.generate(&context()).await.unwrap(),
            vec!["Mock recommendation"]
        );
        assert_eq!(mock.call_count(), 3);
    }
}
