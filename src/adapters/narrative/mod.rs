//! Narrative Adapters
//!
//! - **RuleBasedNarrativeGenerator** - Deterministic recommendations
//! - **FallbackNarrativeGenerator** - External generator with rule-based failover
//! - **MockNarrativeGenerator** - Scripted outputs for tests

mod fallback;
mod mock;
mod rule_based;

pub use fallback::FallbackNarrativeGenerator;
pub use mock::{MockNarrative, MockNarrativeGenerator};
pub use rule_based::RuleBasedNarrativeGenerator;
