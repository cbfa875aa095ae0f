//! Couple Store Adapters
//!
//! - **InMemoryCoupleStore** - Records held in memory (testing/development)
//! - **JsonCoupleStore** - Records read from a JSON array file

mod in_memory;
mod json_file;

pub use in_memory::InMemoryCoupleStore;
pub use json_file::JsonCoupleStore;
