//! AnalyzeCoupleHandler - Risk assessment and counseling recommendations for one couple.
//!
//! Runs the served artifact set on the couple's feature vector and wraps
//! the prediction in reasoning text and narrative recommendations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::adapters::FallbackNarrativeGenerator;
use crate::application::ModelRegistry;
use crate::domain::analysis::{
    DynamicsCalculator, FeatureAssembler, FeatureLengthMismatch, FocusCategory,
    PersonalizedFeatures, ReasoningBuilder, RiskLevel,
};
use crate::domain::catalog::Catalog;
use crate::domain::couple::{CoupleProfile, CoupleProfileInput, LengthRepair, QuestionnaireResponse};
use crate::domain::foundation::{AnalysisId, DomainError, ErrorCode, ValidationError};
use crate::domain::model::{ModelError, Predictor};
use crate::domain::recommendation::RecommendationContext;

/// A couple to analyse, as submitted by a caller.
///
/// Every field may be omitted. Missing demographics default to an average
/// couple and missing answers to neutral.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    #[serde(default)]
    pub couple_id: Option<String>,
    #[serde(default)]
    pub profile: CoupleProfileInput,
    /// Combined questionnaire answers in catalog order.
    #[serde(default)]
    pub questionnaire_responses: Vec<u8>,
    #[serde(default)]
    pub male_responses: Vec<u8>,
    #[serde(default)]
    pub female_responses: Vec<u8>,
    /// Precomputed dynamics; computed from the answers when absent.
    #[serde(default)]
    pub personalized_features: Option<PersonalizedFeatures>,
}

/// Command to analyse one couple.
#[derive(Debug, Clone)]
pub struct AnalyzeCoupleCommand {
    pub request: AnalysisRequest,
}

/// A category score with its catalog name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category: String,
    pub score: f64,
}

/// Input repairs applied before prediction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataQuality {
    /// Set when the answers were padded or truncated to the catalog length.
    pub response_repair: Option<LengthRepair>,
    /// Set when no answers were supplied and neutral answers were assumed.
    pub responses_defaulted: bool,
}

impl DataQuality {
    pub fn is_clean(&self) -> bool {
        self.response_repair.is_none() && !self.responses_defaulted
    }
}

/// Full analysis of one couple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub analysis_id: AnalysisId,
    pub couple_id: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub risk_level: RiskLevel,
    pub confidence: f64,
    /// In catalog order.
    pub category_scores: Vec<CategoryScore>,
    /// Highest score first.
    pub focus_categories: Vec<FocusCategory>,
    pub risk_reasoning: String,
    pub counseling_reasoning: String,
    pub recommendations: Vec<String>,
    pub personalized_features: PersonalizedFeatures,
    pub data_quality: DataQuality,
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("No trained models are loaded")]
    ModelNotLoaded,

    #[error("Expected {} responses, got {}", .0.expected, .0.actual)]
    FeatureLengthMismatch(#[from] FeatureLengthMismatch),

    #[error("Invalid couple profile: {0}")]
    InvalidProfile(ValidationError),

    #[error("Invalid questionnaire responses: {0}")]
    InvalidResponses(ValidationError),

    #[error("Models were trained for {expected} {what}, the catalog implies {actual}")]
    CatalogMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error(transparent)]
    Model(ModelError),
}

impl AnalysisError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            AnalysisError::ModelNotLoaded => ErrorCode::ModelNotLoaded,
            AnalysisError::FeatureLengthMismatch(_) => ErrorCode::FeatureLengthMismatch,
            AnalysisError::InvalidProfile(_) | AnalysisError::InvalidResponses(_) => {
                ErrorCode::ValidationFailed
            }
            AnalysisError::CatalogMismatch { .. } => ErrorCode::CatalogMismatch,
            AnalysisError::Model(e) => e.code(),
        }
    }
}

impl From<ModelError> for AnalysisError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::CatalogMismatch { expected, actual } => AnalysisError::CatalogMismatch {
                what: "categories",
                expected,
                actual,
            },
            other => AnalysisError::Model(other),
        }
    }
}

impl From<AnalysisError> for DomainError {
    fn from(err: AnalysisError) -> Self {
        DomainError::new(err.code(), err.to_string())
    }
}

/// Handler for couple analyses.
pub struct AnalyzeCoupleHandler {
    registry: Arc<ModelRegistry>,
    catalog: Catalog,
    narrator: FallbackNarrativeGenerator,
    response_length_tolerance: usize,
}

impl AnalyzeCoupleHandler {
    pub fn new(
        registry: Arc<ModelRegistry>,
        catalog: Catalog,
        narrator: FallbackNarrativeGenerator,
        response_length_tolerance: usize,
    ) -> Self {
        Self {
            registry,
            catalog,
            narrator,
            response_length_tolerance,
        }
    }

    pub async fn handle(&self, cmd: AnalyzeCoupleCommand) -> Result<AnalysisReport, AnalysisError> {
        let request = cmd.request;

        // 1. Snapshot the served models
        let artifacts = self
            .registry
            .snapshot()
            .await
            .ok_or(AnalysisError::ModelNotLoaded)?;

        let assembler = FeatureAssembler::for_catalog(&self.catalog, self.response_length_tolerance);
        if artifacts.feature_count() != assembler.feature_count() {
            return Err(AnalysisError::CatalogMismatch {
                what: "features",
                expected: artifacts.feature_count(),
                actual: assembler.feature_count(),
            });
        }

        // 2. Validate input
        let profile = CoupleProfile::new(request.profile).map_err(AnalysisError::InvalidProfile)?;
        let male = checked_responses(request.male_responses)?;
        let female = checked_responses(request.female_responses)?;
        let responses_defaulted = request.questionnaire_responses.is_empty();
        let responses = if responses_defaulted {
            QuestionnaireResponse::neutral(self.catalog.question_count())
        } else {
            checked_responses(request.questionnaire_responses)?
        };

        // 3. Dynamics and features
        let dynamics = request.personalized_features.unwrap_or_else(|| {
            DynamicsCalculator::compute_with_fallback(
                male.values(),
                female.values(),
                responses.values(),
            )
        });
        let assembled = assembler.assemble(&profile, responses, &dynamics)?;

        // 4. Predict
        let prediction = Predictor::predict(&artifacts, &self.catalog, &assembled.vector)?;

        // 5. Explain and recommend
        let risk_reasoning =
            ReasoningBuilder::risk_reasoning(&profile, &dynamics, prediction.risk_level);
        let counseling_reasoning = ReasoningBuilder::counseling_reasoning(
            &prediction.focus_categories,
            prediction.confidence,
        );

        let (male_responses, female_responses) =
            partner_responses(male, female, &assembled.responses);
        let context = RecommendationContext {
            risk_level: prediction.risk_level,
            category_scores: prediction.category_scores.clone(),
            focus_categories: prediction.focus_categories.clone(),
            dynamics,
            male_responses,
            female_responses,
            profile,
        };
        let recommendations = self.narrator.recommend(&context).await;

        let category_scores = self
            .catalog
            .categories()
            .iter()
            .zip(&prediction.category_scores)
            .map(|(name, &score)| CategoryScore {
                category: name.clone(),
                score,
            })
            .collect();

        let report = AnalysisReport {
            analysis_id: AnalysisId::new(),
            couple_id: request.couple_id,
            generated_at: Utc::now(),
            risk_level: prediction.risk_level,
            confidence: prediction.confidence,
            category_scores,
            focus_categories: prediction.focus_categories,
            risk_reasoning,
            counseling_reasoning,
            recommendations,
            personalized_features: dynamics,
            data_quality: DataQuality {
                response_repair: assembled.repair,
                responses_defaulted,
            },
        };

        info!(
            analysis_id = %report.analysis_id,
            couple_id = report.couple_id.as_deref().unwrap_or("-"),
            risk_level = %report.risk_level,
            confidence = report.confidence,
            clean_input = report.data_quality.is_clean(),
            "Couple analysed"
        );

        Ok(report)
    }
}

fn checked_responses(values: Vec<u8>) -> Result<QuestionnaireResponse, AnalysisError> {
    QuestionnaireResponse::new(values).map_err(AnalysisError::InvalidResponses)
}

/// Partner answers for the narrative; split from `combined` unless both were given.
fn partner_responses(
    male: QuestionnaireResponse,
    female: QuestionnaireResponse,
    combined: &QuestionnaireResponse,
) -> (Vec<u8>, Vec<u8>) {
    if !male.is_empty() && !female.is_empty() {
        return (male.into(), female.into());
    }
    let values = combined.values();
    if values.len() >= 2 {
        let (m, f) = values.split_at(values.len() / 2);
        (m.to_vec(), f.to_vec())
    } else {
        (values.to_vec(), values.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MockNarrativeGenerator;
    use crate::domain::analysis::feature_count;
    use crate::domain::model::{ForestParams, ModelTrainer};
    use crate::domain::recommendation::MAX_RECOMMENDATIONS;
    use crate::domain::synthetic::{SyntheticGenerator, TrainingSample};
    use crate::ports::NarrativeError;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    async fn trained_registry(catalog: &Catalog) -> Arc<ModelRegistry> {
        let mut rng = StdRng::seed_from_u64(7);
        let samples: Vec<TrainingSample> = SyntheticGenerator::new(catalog)
            .generate(60, &[], &mut rng)
            .unwrap()
            .couples
            .into_iter()
            .map(|c| TrainingSample::with_synthetic_dynamics(c, &mut rng))
            .collect();
        let outcome = ModelTrainer::new(ForestParams {
            n_estimators: 6,
            ..ForestParams::default()
        })
        .train(&samples, &FeatureAssembler::for_catalog(catalog, 0))
        .unwrap();
        let registry = Arc::new(ModelRegistry::new());
        registry.publish(outcome.artifacts).await;
        registry
    }

    fn request(responses: Vec<u8>) -> AnalyzeCoupleCommand {
        AnalyzeCoupleCommand {
            request: AnalysisRequest {
                couple_id: Some("c-42".into()),
                questionnaire_responses: responses,
                ..Default::default()
            },
        }
    }

    async fn handler(narrator: FallbackNarrativeGenerator) -> AnalyzeCoupleHandler {
        let catalog = Catalog::fallback();
        let registry = trained_registry(&catalog).await;
        AnalyzeCoupleHandler::new(registry, catalog, narrator, 2)
    }

    #[tokio::test]
    async fn analysis_before_training_is_model_not_loaded() {
        let handler = AnalyzeCoupleHandler::new(
            Arc::new(ModelRegistry::new()),
            Catalog::fallback(),
            FallbackNarrativeGenerator::new(),
            2,
        );

        let err = handler.handle(request(vec![4, 4, 4, 4])).await.unwrap_err();

        assert!(matches!(err, AnalysisError::ModelNotLoaded));
        assert_eq!(err.code(), ErrorCode::ModelNotLoaded);
    }

    #[tokio::test]
    async fn report_is_complete_and_bounded() {
        let handler = handler(FallbackNarrativeGenerator::new()).await;

        let report = handler.handle(request(vec![2, 4, 3, 2])).await.unwrap();

        assert_eq!(report.couple_id.as_deref(), Some("c-42"));
        assert!((0.0..=1.0).contains(&report.confidence));
        assert_eq!(report.category_scores.len(), 4);
        assert_eq!(report.category_scores[0].category, "Marriage And Relationship");
        assert_eq!(report.focus_categories.len(), 4);
        assert!(!report.recommendations.is_empty());
        assert!(report.recommendations.len() <= MAX_RECOMMENDATIONS);
        assert!(report.risk_reasoning.contains("risk assessment based on"));
        assert!(report
            .counseling_reasoning
            .starts_with("Counseling recommendation based on"));
        assert!(report.data_quality.is_clean());
    }

    #[tokio::test]
    async fn same_request_gives_same_assessment() {
        let handler = handler(FallbackNarrativeGenerator::new()).await;

        let a = handler.handle(request(vec![2, 2, 3, 4])).await.unwrap();
        let b = handler.handle(request(vec![2, 2, 3, 4])).await.unwrap();

        assert_eq!(a.risk_level, b.risk_level);
        assert_eq!(a.confidence, b.confidence);
        assert_eq!(a.category_scores, b.category_scores);
        assert_eq!(a.recommendations, b.recommendations);
        assert_ne!(a.analysis_id, b.analysis_id);
    }

    #[tokio::test]
    async fn short_responses_are_repaired_and_flagged() {
        let handler = handler(FallbackNarrativeGenerator::new()).await;

        let report = handler.handle(request(vec![4, 4, 4])).await.unwrap();

        assert_eq!(
            report.data_quality.response_repair,
            Some(LengthRepair::Padded { from: 3, to: 4 })
        );
    }

    #[tokio::test]
    async fn responses_beyond_tolerance_are_rejected() {
        let handler = handler(FallbackNarrativeGenerator::new()).await;

        let err = handler.handle(request(vec![4; 9])).await.unwrap_err();

        assert!(matches!(
            err,
            AnalysisError::FeatureLengthMismatch(FeatureLengthMismatch {
                expected: 4,
                actual: 9
            })
        ));
    }

    #[tokio::test]
    async fn missing_responses_default_to_neutral() {
        let handler = handler(FallbackNarrativeGenerator::new()).await;

        let report = handler.handle(request(vec![])).await.unwrap();

        assert!(report.data_quality.responses_defaulted);
        assert_eq!(report.personalized_features.alignment_score, 1.0);
    }

    #[tokio::test]
    async fn out_of_scale_answers_are_rejected() {
        let handler = handler(FallbackNarrativeGenerator::new()).await;

        let err = handler.handle(request(vec![4, 5, 3, 3])).await.unwrap_err();

        assert!(matches!(err, AnalysisError::InvalidResponses(_)));
    }

    #[tokio::test]
    async fn underage_partner_is_invalid_profile() {
        let handler = handler(FallbackNarrativeGenerator::new()).await;
        let mut cmd = request(vec![4, 4, 4, 4]);
        cmd.request.profile.female_age = 16;

        let err = handler.handle(cmd).await.unwrap_err();

        assert!(matches!(err, AnalysisError::InvalidProfile(_)));
    }

    #[tokio::test]
    async fn supplied_dynamics_are_used_as_is() {
        let handler = handler(FallbackNarrativeGenerator::new()).await;
        let dynamics = PersonalizedFeatures {
            alignment_score: 0.1,
            conflict_ratio: 0.9,
            ..PersonalizedFeatures::default()
        };
        let mut cmd = request(vec![4, 4, 4, 4]);
        cmd.request.personalized_features = Some(dynamics);

        let report = handler.handle(cmd).await.unwrap();

        assert_eq!(report.personalized_features, dynamics);
    }

    #[tokio::test]
    async fn external_narrative_failure_falls_back() {
        let mock = MockNarrativeGenerator::new().with_error(NarrativeError::unavailable("down"));
        let handler =
            handler(FallbackNarrativeGenerator::new().with_primary(Arc::new(mock.clone()))).await;

        let report = handler.handle(request(vec![2, 2, 2, 2])).await.unwrap();

        assert_eq!(mock.call_count(), 1);
        assert!(report.recommendations[0].contains("RISK PROFILE"));
    }

    #[tokio::test]
    async fn partner_answers_reach_the_narrator() {
        let mock = MockNarrativeGenerator::new();
        let handler =
            handler(FallbackNarrativeGenerator::new().with_primary(Arc::new(mock.clone()))).await;
        let mut cmd = request(vec![4, 3, 2, 4]);
        cmd.request.male_responses = vec![4, 4];
        cmd.request.female_responses = vec![2, 3];

        handler.handle(cmd).await.unwrap();

        let calls = mock.calls();
        assert_eq!(calls[0].male_responses, vec![4, 4]);
        assert_eq!(calls[0].female_responses, vec![2, 3]);
    }

    #[tokio::test]
    async fn combined_answers_are_split_for_the_narrator() {
        let mock = MockNarrativeGenerator::new();
        let handler =
            handler(FallbackNarrativeGenerator::new().with_primary(Arc::new(mock.clone()))).await;

        handler.handle(request(vec![4, 3, 2, 4])).await.unwrap();

        let calls = mock.calls();
        assert_eq!(calls[0].male_responses, vec![4, 3]);
        assert_eq!(calls[0].female_responses, vec![2, 4]);
    }

    #[tokio::test]
    async fn catalog_of_other_width_is_a_mismatch() {
        let catalog = Catalog::fallback();
        let registry = trained_registry(&catalog).await;
        let wider = Catalog::new(
            catalog.categories().to_vec(),
            (1..=4)
                .chain(1..=2)
                .map(|i| crate::domain::catalog::CategoryId::new(i).unwrap())
                .collect(),
        )
        .unwrap();
        let handler =
            AnalyzeCoupleHandler::new(registry, wider, FallbackNarrativeGenerator::new(), 2);

        let err = handler.handle(request(vec![4; 6])).await.unwrap_err();

        assert!(matches!(
            err,
            AnalysisError::CatalogMismatch {
                expected,
                actual,
                ..
            } if expected == feature_count(4) && actual == feature_count(6)
        ));
        assert_eq!(err.code(), ErrorCode::CatalogMismatch);
    }
}
