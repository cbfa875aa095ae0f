//! Risk label encoder mapping risk levels to classifier indices.

use serde::{Deserialize, Serialize};

use crate::domain::analysis::RiskLevel;

use super::errors::ModelError;

/// Ordered risk classes known to the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskLabelEncoder {
    classes: Vec<RiskLevel>,
}

impl RiskLabelEncoder {
    /// Fits the encoder over the full Low, Medium, High label set.
    pub fn fit() -> Self {
        Self {
            classes: RiskLevel::ALL.to_vec(),
        }
    }

    pub fn classes(&self) -> &[RiskLevel] {
        &self.classes
    }

    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    pub fn encode(&self, level: RiskLevel) -> Result<usize, ModelError> {
        self.classes
            .iter()
            .position(|&c| c == level)
            .ok_or_else(|| ModelError::inconsistent(format!("risk level {} is not encoded", level)))
    }

    pub fn decode(&self, index: usize) -> Result<RiskLevel, ModelError> {
        self.classes
            .get(index)
            .copied()
            .ok_or(ModelError::UnknownClass(index))
    }
}
