//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Data Ports
//!
//! - `CatalogReader` - Question catalog source
//! - `CoupleStoreReader` - Observed couples for patterned training data
//!
//! ## Model Ports
//!
//! - `ModelStore` - Blob persistence for the trained artifact set
//!
//! ## Narrative Ports
//!
//! - `NarrativeGenerator` - Recommendation text generation

mod catalog_reader;
mod couple_store_reader;
mod model_store;
mod narrative_generator;

pub use catalog_reader::{CatalogError, CatalogReader};
pub use couple_store_reader::{CoupleRecord, CoupleStoreError, CoupleStoreReader};
pub use model_store::{ModelStore, ModelStoreError};
pub use narrative_generator::{NarrativeError, NarrativeGenerator};
