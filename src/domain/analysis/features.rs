//! Feature Vector Assembler - Fixed-order model input.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::domain::catalog::Catalog;
use crate::domain::couple::{CoupleProfile, LengthRepair, QuestionnaireResponse};

use super::dynamics::PersonalizedFeatures;

/// Demographic features leading every vector.
pub const DEMOGRAPHIC_FEATURE_COUNT: usize = 6;

/// Personalized dynamics features trailing every vector.
pub const PERSONALIZED_FEATURE_COUNT: usize = 8;

/// Total feature count for a catalog of `question_count` answerable questions.
pub const fn feature_count(question_count: usize) -> usize {
    DEMOGRAPHIC_FEATURE_COUNT + question_count + PERSONALIZED_FEATURE_COUNT
}

/// Ordered numeric input shared by the risk classifier and category regressor.
///
/// Layout: six demographics, one value per catalog question, then the
/// eight personalized features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

/// Raised when responses are too far from the catalog size to repair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Feature vector needs {expected} responses, got {actual}")]
pub struct FeatureLengthMismatch {
    pub expected: usize,
    pub actual: usize,
}

/// Result of assembling one couple.
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledFeatures {
    pub vector: FeatureVector,
    /// Responses after length repair, in catalog order.
    pub responses: QuestionnaireResponse,
    /// Set when the responses had to be padded or truncated.
    pub repair: Option<LengthRepair>,
}

/// Builds feature vectors for a fixed catalog size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureAssembler {
    question_count: usize,
    tolerance: usize,
}

impl FeatureAssembler {
    /// Creates an assembler expecting `question_count` responses.
    ///
    /// Sequences within `tolerance` of that length are repaired; anything
    /// further off is rejected.
    pub fn new(question_count: usize, tolerance: usize) -> Self {
        Self {
            question_count,
            tolerance,
        }
    }

    pub fn for_catalog(catalog: &Catalog, tolerance: usize) -> Self {
        Self::new(catalog.question_count(), tolerance)
    }

    pub fn question_count(&self) -> usize {
        self.question_count
    }

    pub fn feature_count(&self) -> usize {
        feature_count(self.question_count)
    }

    /// Assembles the feature vector for one couple.
    pub fn assemble(
        &self,
        profile: &CoupleProfile,
        responses: QuestionnaireResponse,
        dynamics: &PersonalizedFeatures,
    ) -> Result<AssembledFeatures, FeatureLengthMismatch> {
        let (responses, repair) = responses
            .conform(self.question_count, self.tolerance)
            .map_err(|e| FeatureLengthMismatch {
                expected: e.expected,
                actual: e.actual,
            })?;

        if let Some(repair) = &repair {
            warn!(
                expected = self.question_count,
                repair = ?repair,
                "Questionnaire responses resized to catalog length"
            );
        }

        let mut values = Vec::with_capacity(self.feature_count());
        values.extend_from_slice(&profile.demographic_features());
        values.extend(responses.values().iter().map(|&v| f64::from(v)));
        values.extend_from_slice(&dynamics.to_feature_values());

        Ok(AssembledFeatures {
            vector: FeatureVector(values),
            responses,
            repair,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::couple::{CivilStatus, CoupleProfileInput};
    use proptest::prelude::*;

    fn profile() -> CoupleProfile {
        CoupleProfile::new(CoupleProfileInput {
            male_age: 32,
            female_age: 29,
            civil_status: CivilStatus::LivingIn,
            years_living_together: 3,
            past_children: true,
            children: 1,
            education_level: 3,
            income_level: 2,
        })
        .unwrap()
    }

    #[test]
    fn vector_has_demographics_responses_then_dynamics() {
        let assembler = FeatureAssembler::new(4, 0);
        let responses = QuestionnaireResponse::new(vec![2, 3, 4, 4]).unwrap();
        let dynamics = PersonalizedFeatures::default();

        let assembled = assembler.assemble(&profile(), responses, &dynamics).unwrap();
        let values = assembled.vector.values();

        assert_eq!(values.len(), 4 + 14);
        assert_eq!(&values[..6], &[32.0, 29.0, 3.0, 1.0, 3.0, 2.0]);
        assert_eq!(&values[6..10], &[2.0, 3.0, 4.0, 4.0]);
        assert_eq!(values[10], 0.5);
        assert_eq!(values[12], 3.0);
        assert!(assembled.repair.is_none());
    }

    #[test]
    fn vector_length_is_question_count_plus_fourteen() {
        for n in [1usize, 4, 31, 45] {
            let assembler = FeatureAssembler::new(n, 0);
            let assembled = assembler
                .assemble(
                    &profile(),
                    QuestionnaireResponse::neutral(n),
                    &PersonalizedFeatures::default(),
                )
                .unwrap();
            assert_eq!(assembled.vector.len(), n + 14);
            assert_eq!(assembler.feature_count(), n + 14);
        }
    }

    #[test]
    fn short_responses_are_padded_and_flagged() {
        let assembler = FeatureAssembler::new(5, 3);
        let responses = QuestionnaireResponse::new(vec![2, 2]).unwrap();

        let assembled = assembler
            .assemble(&profile(), responses, &PersonalizedFeatures::default())
            .unwrap();

        assert_eq!(assembled.responses.values(), &[2, 2, 3, 3, 3]);
        assert_eq!(
            assembled.repair,
            Some(LengthRepair::Padded { from: 2, to: 5 })
        );
        assert_eq!(assembled.vector.len(), 19);
    }

    #[test]
    fn responses_beyond_tolerance_are_rejected() {
        let assembler = FeatureAssembler::new(30, 2);
        let err = assembler
            .assemble(
                &profile(),
                QuestionnaireResponse::neutral(10),
                &PersonalizedFeatures::default(),
            )
            .unwrap_err();

        assert_eq!(
            err,
            FeatureLengthMismatch {
                expected: 30,
                actual: 10
            }
        );
    }

    #[test]
    fn for_catalog_uses_question_count() {
        let assembler = FeatureAssembler::for_catalog(&Catalog::fallback(), 0);
        assert_eq!(assembler.question_count(), 4);
        assert_eq!(assembler.feature_count(), 18);
    }

    proptest! {
        #[test]
        fn repaired_vectors_always_match_the_catalog(
            n in 1usize..40,
            answers in prop::collection::vec(2u8..=4, 0..50),
        ) {
            let tolerance = 10;
            let assembler = FeatureAssembler::new(n, tolerance);
            let given = answers.len();
            let result = assembler.assemble(
                &profile(),
                QuestionnaireResponse::new(answers).unwrap(),
                &PersonalizedFeatures::default(),
            );

            if given.abs_diff(n) <= tolerance {
                let assembled = result.unwrap();
                prop_assert_eq!(assembled.vector.len(), n + 14);
                prop_assert_eq!(assembled.responses.len(), n);
            } else {
                prop_assert!(result.is_err());
            }
        }
    }
}
