//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `catalog` - Question catalog sources (static, YAML file)
//! - `couples` - Observed couple sources (in-memory, JSON file)
//! - `storage` - Model blob stores (file, in-memory)
//! - `narrative` - Recommendation generators (rule-based, fallback, mock)

pub mod catalog;
pub mod couples;
pub mod narrative;
pub mod storage;

pub use catalog::{StaticCatalogReader, YamlCatalogReader};
pub use couples::{InMemoryCoupleStore, JsonCoupleStore};
pub use narrative::{FallbackNarrativeGenerator, MockNarrativeGenerator, RuleBasedNarrativeGenerator};
pub use storage::{FileModelStore, InMemoryModelStore};
