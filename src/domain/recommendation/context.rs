//! Inputs shared by every narrative generator.

use serde::{Deserialize, Serialize};

use crate::domain::analysis::{FocusCategory, PersonalizedFeatures, RiskLevel};
use crate::domain::couple::{CoupleProfile, AGREE_RESPONSE};

/// Everything a narrative generator may draw on for one couple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationContext {
    pub risk_level: RiskLevel,
    pub category_scores: Vec<f64>,
    /// Highest score first.
    pub focus_categories: Vec<FocusCategory>,
    pub dynamics: PersonalizedFeatures,
    pub male_responses: Vec<u8>,
    pub female_responses: Vec<u8>,
    pub profile: CoupleProfile,
}

impl RecommendationContext {
    /// Share of the male partner's answers that agree; `None` without answers.
    pub fn male_positive_ratio(&self) -> Option<f64> {
        positive_ratio(&self.male_responses)
    }

    /// Share of the female partner's answers that agree; `None` without answers.
    pub fn female_positive_ratio(&self) -> Option<f64> {
        positive_ratio(&self.female_responses)
    }

    /// Mean of both partners' positive ratios, missing partners counting as 0.
    pub fn couple_optimism(&self) -> f64 {
        let male = self.male_positive_ratio().unwrap_or(0.0);
        let female = self.female_positive_ratio().unwrap_or(0.0);
        (male + female) / 2.0
    }
}

fn positive_ratio(responses: &[u8]) -> Option<f64> {
    if responses.is_empty() {
        return None;
    }
    let agreeing = responses.iter().filter(|&&r| r >= AGREE_RESPONSE).count();
    Some(agreeing as f64 / responses.len() as f64)
}
