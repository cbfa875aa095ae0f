//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types
//! that form the vocabulary of the counseling domain.

mod errors;
mod ids;
mod percentage;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::AnalysisId;
pub use percentage::Percentage;
