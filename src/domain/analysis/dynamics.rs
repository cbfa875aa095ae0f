//! Personalized Dynamics Calculator - Relationship metrics from paired answers.

use serde::{Deserialize, Serialize};

/// Widest possible gap between two answers on the 2-4 scale.
pub const ALIGNMENT_SPAN: f64 = 2.0;

/// Conflict weight for answers two or more steps apart.
pub const STRONG_CONFLICT_WEIGHT: f64 = 1.0;
/// Conflict weight for a neutral/disagree pairing.
pub const NEUTRAL_DISAGREE_WEIGHT: f64 = 0.6;
/// Conflict weight for an agree/neutral pairing.
pub const AGREE_NEUTRAL_WEIGHT: f64 = 0.4;
/// Conflict weight for any other one-step gap.
pub const MILD_CONFLICT_WEIGHT: f64 = 0.5;

/// Alignment reported when no answer pairs can be compared.
const NO_PAIRS_ALIGNMENT: f64 = 0.5;
/// Average reported for a partner with no answers.
const EMPTY_AVERAGE: f64 = 3.0;
/// Variance that maps to zero consistency.
const CONSISTENCY_VARIANCE_SCALE: f64 = 4.0;

/// Relationship dynamics derived from a couple's answers.
///
/// Missing fields in serialized input take the values of an average,
/// uninformative couple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PersonalizedFeatures {
    #[serde(default = "default_alignment")]
    pub alignment_score: f64,
    #[serde(default)]
    pub conflict_ratio: f64,
    #[serde(default = "default_average")]
    pub male_avg_response: f64,
    #[serde(default = "default_average")]
    pub female_avg_response: f64,
    #[serde(default = "default_consistency")]
    pub male_consistency: f64,
    #[serde(default = "default_consistency")]
    pub female_consistency: f64,
    #[serde(default)]
    pub power_balance: f64,
    #[serde(default)]
    pub response_variance: f64,
    #[serde(default)]
    pub total_conflicts: u32,
}

fn default_alignment() -> f64 {
    NO_PAIRS_ALIGNMENT
}

fn default_average() -> f64 {
    EMPTY_AVERAGE
}

fn default_consistency() -> f64 {
    0.5
}

impl Default for PersonalizedFeatures {
    fn default() -> Self {
        Self {
            alignment_score: default_alignment(),
            conflict_ratio: 0.0,
            male_avg_response: default_average(),
            female_avg_response: default_average(),
            male_consistency: default_consistency(),
            female_consistency: default_consistency(),
            power_balance: 0.0,
            response_variance: 0.0,
            total_conflicts: 0,
        }
    }
}

impl PersonalizedFeatures {
    /// The eight model features in vector order.
    pub fn to_feature_values(&self) -> [f64; 8] {
        [
            self.alignment_score,
            self.conflict_ratio,
            self.male_avg_response,
            self.female_avg_response,
            self.male_consistency,
            self.female_consistency,
            self.power_balance,
            self.response_variance,
        ]
    }
}

/// Calculator for partner dynamics. Pure and total over any input.
pub struct DynamicsCalculator;

impl DynamicsCalculator {
    /// Computes dynamics from separate partner answers.
    ///
    /// Answers are compared position by position up to the shorter
    /// sequence; variance is taken over both sequences pooled.
    pub fn compute(male: &[u8], female: &[u8]) -> PersonalizedFeatures {
        let pooled: Vec<u8> = male.iter().chain(female).copied().collect();
        Self::compute_pooled(male, female, &pooled)
    }

    /// Computes dynamics from one combined sequence.
    ///
    /// The first half is read as the male partner and the rest as the
    /// female partner. A single answer stands in for both.
    pub fn compute_from_combined(combined: &[u8]) -> PersonalizedFeatures {
        let (male, female) = if combined.len() >= 2 {
            combined.split_at(combined.len() / 2)
        } else {
            (combined, combined)
        };
        Self::compute_pooled(male, female, combined)
    }

    /// Uses partner answers when both are present, otherwise splits `combined`.
    pub fn compute_with_fallback(
        male: &[u8],
        female: &[u8],
        combined: &[u8],
    ) -> PersonalizedFeatures {
        if !male.is_empty() && !female.is_empty() {
            Self::compute(male, female)
        } else {
            Self::compute_from_combined(combined)
        }
    }

    /// Agreement of one answer pair in [0, 1].
    pub fn pair_alignment(male: u8, female: u8) -> f64 {
        let gap = f64::from(male.abs_diff(female));
        (1.0 - gap / ALIGNMENT_SPAN).max(0.0)
    }

    /// Conflict weight of one answer pair.
    ///
    /// The weighting is asymmetric: disagreeing against a neutral partner
    /// weighs more than agreeing against one.
    pub fn conflict_weight(male: u8, female: u8) -> f64 {
        match male.abs_diff(female) {
            0 => 0.0,
            1 => match (male, female) {
                (3, 2) | (2, 3) => NEUTRAL_DISAGREE_WEIGHT,
                (4, 3) | (3, 4) => AGREE_NEUTRAL_WEIGHT,
                _ => MILD_CONFLICT_WEIGHT,
            },
            _ => STRONG_CONFLICT_WEIGHT,
        }
    }

    /// Consistency of one partner's answers in [0, 1].
    ///
    /// Fewer than two answers count as perfectly consistent.
    pub fn consistency(responses: &[u8]) -> f64 {
        if responses.len() < 2 {
            return 1.0;
        }
        (1.0 - population_variance(responses) / CONSISTENCY_VARIANCE_SCALE).max(0.0)
    }

    fn compute_pooled(male: &[u8], female: &[u8], pooled: &[u8]) -> PersonalizedFeatures {
        let compared = male.len().min(female.len());

        let mut alignment_sum = 0.0;
        let mut weighted_conflicts = 0.0;
        let mut total_conflicts = 0u32;
        for (&m, &f) in male.iter().zip(female) {
            alignment_sum += Self::pair_alignment(m, f);
            weighted_conflicts += Self::conflict_weight(m, f);
            if m.abs_diff(f) >= 2 {
                total_conflicts += 1;
            }
        }

        let (alignment_score, conflict_ratio) = if compared > 0 {
            (
                alignment_sum / compared as f64,
                weighted_conflicts / compared as f64,
            )
        } else {
            (NO_PAIRS_ALIGNMENT, 0.0)
        };

        let male_avg_response = mean(male).unwrap_or(EMPTY_AVERAGE);
        let female_avg_response = mean(female).unwrap_or(EMPTY_AVERAGE);
        let power_balance = if female_avg_response > 0.0 {
            male_avg_response / female_avg_response
        } else {
            1.0
        };

        let response_variance = if pooled.len() > 1 {
            population_variance(pooled)
        } else {
            0.0
        };

        PersonalizedFeatures {
            alignment_score,
            conflict_ratio,
            male_avg_response,
            female_avg_response,
            male_consistency: Self::consistency(male),
            female_consistency: Self::consistency(female),
            power_balance,
            response_variance,
            total_conflicts,
        }
    }
}

fn mean(values: &[u8]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sum: f64 = values.iter().map(|&v| f64::from(v)).sum();
    Some(sum / values.len() as f64)
}

fn population_variance(values: &[u8]) -> f64 {
    let Some(mean) = mean(values) else {
        return 0.0;
    };
    values
        .iter()
        .map(|&v| (f64::from(v) - mean).powi(2))
        .sum::<f64>()
        / values.len() as f64
}
