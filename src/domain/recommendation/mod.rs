//! Recommendation module - Narrative guidance for an analysed couple.

mod context;
mod rule_based;

pub use context::RecommendationContext;
pub use rule_based::{RuleBasedNarrator, MAX_RECOMMENDATIONS};
