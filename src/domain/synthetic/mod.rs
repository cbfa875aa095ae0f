//! Synthetic Population Generator - Labelled couples for model training.
//!
//! Two modes exist. `PatternedGenerator` perturbs observed couples and is
//! used whenever at least one observed couple is available.
//! `GenericGenerator` draws couples from fixed age archetypes otherwise.
//!
//! All draws come from the caller's RNG, so a seeded RNG reproduces the
//! population exactly.

mod generic;
mod patterned;

pub use generic::GenericGenerator;
pub use patterned::PatternedGenerator;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::analysis::{category_scores, PersonalizedFeatures, RiskLevel, RiskThresholds};
use crate::domain::catalog::Catalog;
use crate::domain::couple::{CoupleProfile, QuestionnaireResponse};
use crate::domain::foundation::ValidationError;

/// A couple with its derived risk label and category scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledCouple {
    pub profile: CoupleProfile,
    pub responses: QuestionnaireResponse,
    pub risk_level: RiskLevel,
    pub category_scores: Vec<f64>,
}

impl LabeledCouple {
    /// Labels a couple from its responses.
    pub fn label(
        profile: CoupleProfile,
        responses: QuestionnaireResponse,
        catalog: &Catalog,
        thresholds: &RiskThresholds,
    ) -> Self {
        let risk_level = thresholds.label(&responses);
        let category_scores = category_scores(catalog, &responses);
        Self {
            profile,
            responses,
            risk_level,
            category_scores,
        }
    }
}

/// One row of the training set.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSample {
    pub couple: LabeledCouple,
    pub dynamics: PersonalizedFeatures,
}

impl TrainingSample {
    /// Pairs a couple with dynamics drawn for its risk level.
    pub fn with_synthetic_dynamics<R: Rng + ?Sized>(couple: LabeledCouple, rng: &mut R) -> Self {
        let dynamics = synthetic_dynamics(couple.risk_level, rng);
        Self { couple, dynamics }
    }
}

/// Draws plausible dynamics for a couple of the given risk level.
///
/// High risk draws low alignment and high conflict, Low risk the reverse.
pub fn synthetic_dynamics<R: Rng + ?Sized>(risk_level: RiskLevel, rng: &mut R) -> PersonalizedFeatures {
    let (alignment, conflict, power) = match risk_level {
        RiskLevel::High => (0.2..0.5, 0.3..0.7, 1.0..2.5),
        RiskLevel::Low => (0.6..0.9, 0.0..0.2, 0.0..0.8),
        RiskLevel::Medium => (0.4..0.7, 0.1..0.4, 0.5..1.5),
    };

    let alignment_score = rng.gen_range(alignment);
    let conflict_ratio = rng.gen_range(conflict);
    let power_balance = rng.gen_range(power);

    PersonalizedFeatures {
        alignment_score,
        conflict_ratio,
        male_avg_response: rng.gen_range(2.5..3.5),
        female_avg_response: rng.gen_range(2.5..3.5),
        male_consistency: rng.gen_range(0.3..0.8),
        female_consistency: rng.gen_range(0.3..0.8),
        power_balance,
        response_variance: rng.gen_range(0.5..2.0),
        total_conflicts: 0,
    }
}

/// Which generator produced a population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PopulationSource {
    Patterned,
    Generic,
}

/// A generated training population.
#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    pub source: PopulationSource,
    pub couples: Vec<LabeledCouple>,
}

/// Picks the generation mode and produces a population.
pub struct SyntheticGenerator<'a> {
    catalog: &'a Catalog,
}

impl<'a> SyntheticGenerator<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Generates `count` couples, patterned on `observed` when it is non-empty.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        count: usize,
        observed: &[LabeledCouple],
        rng: &mut R,
    ) -> Result<Population, ValidationError> {
        match PatternedGenerator::new(self.catalog, observed) {
            Some(patterned) => {
                info!(
                    count,
                    observed = observed.len(),
                    "Generating synthetic couples patterned on observed couples"
                );
                let couples = (0..count)
                    .map(|_| patterned.generate_one(rng))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Population {
                    source: PopulationSource::Patterned,
                    couples,
                })
            }
            None => {
                info!(count, "No observed couples, generating generic synthetic couples");
                let generic = GenericGenerator::new(self.catalog)?;
                let couples = (0..count)
                    .map(|_| generic.generate_one(rng))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Population {
                    source: PopulationSource::Generic,
                    couples,
                })
            }
        }
    }
}

/// Uniform pick from a non-empty slice.
fn pick<T: Copy, R: Rng + ?Sized>(values: &[T], rng: &mut R) -> T {
    values[rng.gen_range(0..values.len())]
}
