//! Model-specific error types.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Errors raised while fitting, serving, or decoding models.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// No rows to fit on.
    #[error("Cannot fit a model on an empty data set")]
    EmptyDataSet,

    /// A row has a different width than the model expects.
    #[error("Expected {expected} features, got {actual}")]
    FeatureCountMismatch { expected: usize, actual: usize },

    /// Feature rows and targets disagree in count.
    #[error("Got {samples} samples but {targets} targets")]
    TargetCountMismatch { samples: usize, targets: usize },

    /// The serving catalog has a different category count than the model.
    #[error("Model scores {expected} categories but the catalog has {actual}")]
    CatalogMismatch { expected: usize, actual: usize },

    /// A fitting parameter is unusable.
    #[error("Invalid model parameter: {0}")]
    InvalidParameter(String),

    /// A class index has no label.
    #[error("Class index {0} has no risk label")]
    UnknownClass(usize),

    /// Parts of an artifact set do not fit together.
    #[error("Inconsistent model artifacts: {0}")]
    Inconsistent(String),

    /// A stored blob could not be encoded or decoded.
    #[error("Model serialization failed: {0}")]
    Serialization(String),
}

impl ModelError {
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        ModelError::InvalidParameter(message.into())
    }

    pub fn inconsistent(message: impl Into<String>) -> Self {
        ModelError::Inconsistent(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ModelError::EmptyDataSet => ErrorCode::EmptyTrainingSet,
            ModelError::FeatureCountMismatch { .. } => ErrorCode::FeatureLengthMismatch,
            ModelError::CatalogMismatch { .. } => ErrorCode::CatalogMismatch,
            ModelError::TargetCountMismatch { .. }
            | ModelError::InvalidParameter(_)
            | ModelError::UnknownClass(_)
            | ModelError::Inconsistent(_) => ErrorCode::ModelFitFailed,
            ModelError::Serialization(_) => ErrorCode::SerializationError,
        }
    }
}

impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        ModelError::Serialization(err.to_string())
    }
}

impl From<ModelError> for DomainError {
    fn from(err: ModelError) -> Self {
        DomainError::new(err.code(), err.to_string())
    }
}
