//! Catalog Adapters
//!
//! - **StaticCatalogReader** - Fixed in-memory catalog (fallback, tests)
//! - **YamlCatalogReader** - Category sections from a YAML file

mod static_reader;
mod yaml_reader;

pub use static_reader::StaticCatalogReader;
pub use yaml_reader::YamlCatalogReader;
