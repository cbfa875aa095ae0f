//! Couple Store Reader Port - Observed couples used to pattern training data.
//!
//! Records come from the counseling database as stored: demographic fields
//! may be missing and answers are text labels ("agree", "neutral",
//! "disagree"). Conversion into domain types happens in the training handler.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::couple::{Answer, CivilStatus, CoupleProfileInput, QuestionnaireResponse};
use crate::domain::foundation::{DomainError, ErrorCode};

/// A couple as held by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoupleRecord {
    #[serde(default)]
    pub couple_id: Option<String>,
    #[serde(default)]
    pub male_age: Option<u32>,
    #[serde(default)]
    pub female_age: Option<u32>,
    #[serde(default)]
    pub civil_status: Option<String>,
    #[serde(default)]
    pub years_living_together: Option<u32>,
    #[serde(default)]
    pub past_children: Option<bool>,
    #[serde(default)]
    pub children: Option<u32>,
    #[serde(default)]
    pub education_level: Option<u8>,
    #[serde(default)]
    pub income_level: Option<u8>,
    /// Answer labels in question order.
    #[serde(default)]
    pub answers: Vec<String>,
}

impl CoupleRecord {
    /// Raw profile with missing fields defaulted.
    ///
    /// An unrecognized civil status is read as Single.
    pub fn profile_input(&self) -> CoupleProfileInput {
        let defaults = CoupleProfileInput::default();
        CoupleProfileInput {
            male_age: self.male_age.unwrap_or(defaults.male_age),
            female_age: self.female_age.unwrap_or(defaults.female_age),
            civil_status: self
                .civil_status
                .as_deref()
                .and_then(|s| s.parse::<CivilStatus>().ok())
                .unwrap_or_default(),
            years_living_together: self.years_living_together.unwrap_or(0),
            past_children: self.past_children.unwrap_or(false),
            children: self.children.unwrap_or(0),
            education_level: self.education_level.unwrap_or(defaults.education_level),
            income_level: self.income_level.unwrap_or(defaults.income_level),
        }
    }

    /// Answers encoded as 4 / 3 / 2.
    pub fn responses(&self) -> QuestionnaireResponse {
        let answers: Vec<Answer> = self.answers.iter().map(|a| Answer::from_label(a)).collect();
        QuestionnaireResponse::from_answers(&answers)
    }
}

/// Errors that can occur while reading couples
#[derive(Debug, thiserror::Error)]
pub enum CoupleStoreError {
    #[error("Couple store unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to parse couple records: {0}")]
    Parse(String),
}

impl CoupleStoreError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            CoupleStoreError::Unavailable(_) => ErrorCode::CoupleStoreUnavailable,
            CoupleStoreError::Parse(_) => ErrorCode::SerializationError,
        }
    }
}

impl From<CoupleStoreError> for DomainError {
    fn from(err: CoupleStoreError) -> Self {
        DomainError::new(err.code(), err.to_string())
    }
}

/// Query port for observed couples
#[async_trait]
pub trait CoupleStoreReader: Send + Sync {
    /// List every stored couple with its answers
    async fn list_couples(&self) -> Result<Vec<CoupleRecord>, CoupleStoreError>;
}
