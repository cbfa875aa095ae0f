//! Catalog Reader Port - Source of the MEAI question catalog.
//!
//! The catalog (category names plus the question → category mapping) lives
//! in an external store. Readers return a fully validated `Catalog` snapshot
//! that callers pass explicitly to the components that need it.

use async_trait::async_trait;

use crate::domain::catalog::Catalog;
use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};

/// Errors that can occur while loading the catalog
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Catalog source unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to parse catalog: {0}")]
    Parse(String),

    #[error("Catalog is invalid: {0}")]
    Invalid(#[from] ValidationError),
}

impl CatalogError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            CatalogError::Unavailable(_) => ErrorCode::CatalogUnavailable,
            CatalogError::Parse(_) => ErrorCode::SerializationError,
            CatalogError::Invalid(_) => ErrorCode::ValidationFailed,
        }
    }
}

impl From<CatalogError> for DomainError {
    fn from(err: CatalogError) -> Self {
        DomainError::new(err.code(), err.to_string())
    }
}

/// Port for loading the question catalog
#[async_trait]
pub trait CatalogReader: Send + Sync {
    /// Load the current catalog
    ///
    /// # Errors
    /// Returns `CatalogError::Unavailable` when the source cannot be reached
    /// and `CatalogError::Parse` / `Invalid` when its content is unusable
    async fn load_catalog(&self) -> Result<Catalog, CatalogError>;
}
