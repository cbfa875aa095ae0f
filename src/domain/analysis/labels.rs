//! Risk labels and category scores derived from raw responses.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::catalog::Catalog;
use crate::domain::couple::{QuestionnaireResponse, DISAGREE_RESPONSE};
use crate::domain::foundation::ValidationError;

/// Score given to a category with no mapped or available responses.
pub const UNSCORED_CATEGORY: f64 = 0.5;

/// Multiplier turning a category disagreement ratio into a score.
const CATEGORY_DISAGREE_SCALE: f64 = 2.0;

/// Relationship risk class.
///
/// Ordering follows the class index used by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 3] = [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High];

    pub fn index(&self) -> usize {
        match self {
            RiskLevel::Low => 0,
            RiskLevel::Medium => 1,
            RiskLevel::High => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RiskLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                ValidationError::invalid_format("risk_level", format!("unknown value '{}'", s))
            })
    }
}

/// Disagreement-ratio cut points for labelling risk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskThresholds {
    /// Ratios strictly above this are High.
    pub high: f64,
    /// Ratios strictly above this (and not High) are Medium.
    pub medium: f64,
}

/// Thresholds for observed couples and populations patterned on them.
pub const OBSERVED_RISK_THRESHOLDS: RiskThresholds = RiskThresholds {
    high: 0.30,
    medium: 0.15,
};

/// Thresholds for the generic synthetic population.
pub const GENERIC_RISK_THRESHOLDS: RiskThresholds = RiskThresholds {
    high: 0.35,
    medium: 0.15,
};

impl RiskThresholds {
    pub fn classify(&self, disagree_ratio: f64) -> RiskLevel {
        if disagree_ratio > self.high {
            RiskLevel::High
        } else if disagree_ratio > self.medium {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn label(&self, responses: &QuestionnaireResponse) -> RiskLevel {
        self.classify(responses.disagree_ratio())
    }
}

/// Per-category concern scores in catalog order.
///
/// Each score is `min(1, 2 * disagree_ratio)` over the category's mapped
/// questions that have a response.
pub fn category_scores(catalog: &Catalog, responses: &QuestionnaireResponse) -> Vec<f64> {
    catalog
        .category_ids()
        .map(|id| {
            let answered: Vec<u8> = catalog
                .question_ordinals(id)
                .into_iter()
                .filter_map(|ordinal| responses.at_ordinal(ordinal))
                .collect();
            if answered.is_empty() {
                return UNSCORED_CATEGORY;
            }
            let disagreements = answered.iter().filter(|&&v| v == DISAGREE_RESPONSE).count();
            let ratio = disagreements as f64 / answered.len() as f64;
            (ratio * CATEGORY_DISAGREE_SCALE).min(1.0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::CategoryId;

    fn responses(values: Vec<u8>) -> QuestionnaireResponse {
        QuestionnaireResponse::new(values).unwrap()
    }

    #[test]
    fn risk_level_round_trips_through_index() {
        for level in RiskLevel::ALL {
            assert_eq!(RiskLevel::from_index(level.index()), Some(level));
        }
        assert_eq!(RiskLevel::from_index(3), None);
    }

    #[test]
    fn risk_level_parses_labels() {
        assert_eq!("high".parse::<RiskLevel>().unwrap(), RiskLevel::High);
        assert!("severe".parse::<RiskLevel>().is_err());
    }

    #[test]
    fn observed_thresholds_are_strict() {
        assert_eq!(OBSERVED_RISK_THRESHOLDS.classify(0.30), RiskLevel::Medium);
        assert_eq!(OBSERVED_RISK_THRESHOLDS.classify(0.31), RiskLevel::High);
        assert_eq!(OBSERVED_RISK_THRESHOLDS.classify(0.15), RiskLevel::Low);
        assert_eq!(OBSERVED_RISK_THRESHOLDS.classify(0.16), RiskLevel::Medium);
    }

    #[test]
    fn generic_thresholds_differ_on_high() {
        assert_eq!(GENERIC_RISK_THRESHOLDS.classify(0.32), RiskLevel::Medium);
        assert_eq!(OBSERVED_RISK_THRESHOLDS.classify(0.32), RiskLevel::High);
    }

    #[test]
    fn label_uses_disagree_ratio() {
        let r = responses(vec![2, 2, 4, 4, 3]);
        assert_eq!(OBSERVED_RISK_THRESHOLDS.label(&r), RiskLevel::High);
        let r = responses(vec![4, 4, 4, 4]);
        assert_eq!(OBSERVED_RISK_THRESHOLDS.label(&r), RiskLevel::Low);
    }

    #[test]
    fn category_scores_double_disagreement_and_cap_at_one() {
        let one = CategoryId::new(1).unwrap();
        let two = CategoryId::new(2).unwrap();
        let catalog = Catalog::new(
            vec!["Marriage".into(), "Family".into()],
            vec![one, one, one, one, two, two],
        )
        .unwrap();

        let scores = category_scores(&catalog, &responses(vec![2, 4, 4, 4, 2, 2]));
        assert!((scores[0] - 0.5).abs() < 1e-12);
        assert!((scores[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn category_without_responses_scores_half() {
        let one = CategoryId::new(1).unwrap();
        let two = CategoryId::new(2).unwrap();
        let catalog = Catalog::new(vec!["A".into(), "B".into()], vec![one, two]).unwrap();

        let scores = category_scores(&catalog, &responses(vec![2]));
        assert_eq!(scores, vec![1.0, 0.5]);
    }
}
