//! Questionnaire answers on the ternary disagree/neutral/agree scale.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::foundation::ValidationError;

pub const DISAGREE_RESPONSE: u8 = 2;
pub const NEUTRAL_RESPONSE: u8 = 3;
pub const AGREE_RESPONSE: u8 = 4;

/// A single questionnaire answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Answer {
    Disagree,
    Neutral,
    Agree,
}

impl Answer {
    /// Encodes an answer label from the store.
    ///
    /// "agree" and "neutral" map to their answers; every other label is
    /// treated as disagreement.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "agree" => Answer::Agree,
            "neutral" => Answer::Neutral,
            _ => Answer::Disagree,
        }
    }

    /// Decodes a numeric response value.
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            DISAGREE_RESPONSE => Some(Answer::Disagree),
            NEUTRAL_RESPONSE => Some(Answer::Neutral),
            AGREE_RESPONSE => Some(Answer::Agree),
            _ => None,
        }
    }

    /// Numeric value used in feature vectors.
    pub fn value(&self) -> u8 {
        match self {
            Answer::Disagree => DISAGREE_RESPONSE,
            Answer::Neutral => NEUTRAL_RESPONSE,
            Answer::Agree => AGREE_RESPONSE,
        }
    }
}

/// Data-quality flag raised when a response sequence had to be resized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LengthRepair {
    /// Right-padded with neutral answers.
    Padded { from: usize, to: usize },
    /// Trailing answers dropped.
    Truncated { from: usize, to: usize },
}

/// Raised when a response sequence is too far from the catalog size to repair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Expected {expected} responses, got {actual} (tolerance {tolerance})")]
pub struct ResponseLengthError {
    pub expected: usize,
    pub actual: usize,
    pub tolerance: usize,
}

/// Ordered questionnaire responses, one per answerable catalog question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct QuestionnaireResponse(Vec<u8>);

impl QuestionnaireResponse {
    /// Creates a response sequence, rejecting values outside 2-4.
    pub fn new(values: Vec<u8>) -> Result<Self, ValidationError> {
        if let Some(bad) = values
            .iter()
            .find(|v| !(DISAGREE_RESPONSE..=AGREE_RESPONSE).contains(*v))
        {
            return Err(ValidationError::out_of_range(
                "questionnaire_responses",
                i64::from(DISAGREE_RESPONSE),
                i64::from(AGREE_RESPONSE),
                i64::from(*bad),
            ));
        }
        Ok(Self(values))
    }

    /// All-neutral responses of the given length.
    pub fn neutral(len: usize) -> Self {
        Self(vec![NEUTRAL_RESPONSE; len])
    }

    pub fn from_answers(answers: &[Answer]) -> Self {
        Self(answers.iter().map(Answer::value).collect())
    }

    pub fn values(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Response at a 1-indexed question ordinal.
    pub fn at_ordinal(&self, ordinal: usize) -> Option<u8> {
        ordinal.checked_sub(1).and_then(|i| self.0.get(i)).copied()
    }

    pub fn disagree_count(&self) -> usize {
        self.0.iter().filter(|&&v| v == DISAGREE_RESPONSE).count()
    }

    /// Fraction of responses that are disagreements; 0 for an empty sequence.
    pub fn disagree_ratio(&self) -> f64 {
        if self.0.is_empty() {
            return 0.0;
        }
        self.disagree_count() as f64 / self.0.len() as f64
    }

    /// Resizes to `expected` responses when within `tolerance`.
    ///
    /// Short sequences are right-padded with neutral answers and long ones
    /// truncated; either repair is reported so callers can flag it.
    pub fn conform(
        mut self,
        expected: usize,
        tolerance: usize,
    ) -> Result<(Self, Option<LengthRepair>), ResponseLengthError> {
        let actual = self.0.len();
        if actual == expected {
            return Ok((self, None));
        }
        if actual.abs_diff(expected) > tolerance {
            return Err(ResponseLengthError {
                expected,
                actual,
                tolerance,
            });
        }

        let repair = if actual < expected {
            self.0.resize(expected, NEUTRAL_RESPONSE);
            LengthRepair::Padded {
                from: actual,
                to: expected,
            }
        } else {
            self.0.truncate(expected);
            LengthRepair::Truncated {
                from: actual,
                to: expected,
            }
        };
        Ok((self, Some(repair)))
    }
}

impl TryFrom<Vec<u8>> for QuestionnaireResponse {
    type Error = ValidationError;

    fn try_from(values: Vec<u8>) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

impl From<QuestionnaireResponse> for Vec<u8> {
    fn from(response: QuestionnaireResponse) -> Self {
        response.0
    }
}
