//! Storage Adapters
//!
//! Implementations of the ModelStore port for persisting trained models.
//!
//! ## Available Adapters
//!
//! - **FileModelStore** - Stores each artifact as a JSON file on disk
//! - **InMemoryModelStore** - Stores artifacts in memory (testing/development)
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{FileModelStore, InMemoryModelStore};
//!
//! // Production: file-based storage
//! let store = FileModelStore::new("./data/models");
//!
//! // Testing: in-memory storage
//! let store = InMemoryModelStore::new();
//! ```

mod file_model_store;
mod in_memory_model_store;

pub use file_model_store::FileModelStore;
pub use in_memory_model_store::InMemoryModelStore;
