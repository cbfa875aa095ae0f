//! Generic synthetic couples drawn from fixed age archetypes.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::domain::analysis::GENERIC_RISK_THRESHOLDS;
use crate::domain::catalog::Catalog;
use crate::domain::couple::{
    CivilStatus, CoupleProfile, CoupleProfileInput, QuestionnaireResponse, AGREE_RESPONSE,
    DISAGREE_RESPONSE, NEUTRAL_RESPONSE,
};
use crate::domain::foundation::ValidationError;

use super::{pick, LabeledCouple};

const MIN_AGE: u32 = 18;
const MAX_AGE: u32 = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RiskBias {
    High,
    Medium,
    Low,
}

struct Archetype {
    /// Inclusive male age range.
    ages: (u32, u32),
    bias: RiskBias,
    weight: f64,
}

const ARCHETYPES: [Archetype; 5] = [
    Archetype { ages: (18, 25), bias: RiskBias::High, weight: 0.15 },
    Archetype { ages: (25, 30), bias: RiskBias::Medium, weight: 0.25 },
    Archetype { ages: (30, 40), bias: RiskBias::Low, weight: 0.30 },
    Archetype { ages: (40, 50), bias: RiskBias::Low, weight: 0.20 },
    Archetype { ages: (50, 70), bias: RiskBias::Medium, weight: 0.10 },
];

/// Inclusive age-gap buckets and their weights.
const AGE_GAP_BUCKETS: [(u32, u32); 5] = [(0, 2), (1, 3), (2, 5), (5, 15), (15, 25)];
const AGE_GAP_WEIGHTS: [f64; 5] = [0.40, 0.30, 0.20, 0.08, 0.02];

const HIGH_BIAS_STATUSES: &[CivilStatus] = &[
    CivilStatus::Single,
    CivilStatus::Single,
    CivilStatus::LivingIn,
    CivilStatus::Separated,
    CivilStatus::Divorced,
];
const LOW_BIAS_STATUSES: &[CivilStatus] = &[
    CivilStatus::Single,
    CivilStatus::LivingIn,
    CivilStatus::LivingIn,
    CivilStatus::Widowed,
];
const MEDIUM_BIAS_STATUSES: &[CivilStatus] = &[
    CivilStatus::Single,
    CivilStatus::LivingIn,
    CivilStatus::Widowed,
    CivilStatus::Separated,
];

const EDUCATION_LEVELS: [u8; 5] = [0, 1, 2, 3, 4];
/// Education weights for male ages under 25, under 40, and 40 or over.
const EDUCATION_WEIGHTS: [[f64; 5]; 3] = [
    [0.1, 0.2, 0.4, 0.2, 0.1],
    [0.05, 0.1, 0.3, 0.4, 0.15],
    [0.05, 0.05, 0.2, 0.5, 0.2],
];

/// Income levels and weights for education 3+, exactly 2, and below 2.
const INCOME_BANDS: [(&[u8], &[f64]); 3] = [
    (&[2, 3, 4], &[0.2, 0.5, 0.3]),
    (&[1, 2, 3, 4], &[0.1, 0.4, 0.4, 0.1]),
    (&[0, 1, 2, 3], &[0.2, 0.4, 0.3, 0.1]),
];

fn weights(field: &str, table: &[f64]) -> Result<WeightedIndex<f64>, ValidationError> {
    WeightedIndex::new(table).map_err(|e| ValidationError::invalid_format(field, e.to_string()))
}

/// Generic couples for when no observed couples exist.
pub struct GenericGenerator<'a> {
    catalog: &'a Catalog,
    archetypes: WeightedIndex<f64>,
    age_gaps: WeightedIndex<f64>,
    education: [WeightedIndex<f64>; 3],
    income: [WeightedIndex<f64>; 3],
}

impl<'a> GenericGenerator<'a> {
    pub fn new(catalog: &'a Catalog) -> Result<Self, ValidationError> {
        let [young, adult, mature] = &EDUCATION_WEIGHTS;
        let [high, middle, low] = INCOME_BANDS.map(|(_, w)| w);
        Ok(Self {
            catalog,
            archetypes: weights("archetype_weights", &ARCHETYPES.map(|a| a.weight))?,
            age_gaps: weights("age_gap_weights", &AGE_GAP_WEIGHTS)?,
            education: [
                weights("education_weights", young)?,
                weights("education_weights", adult)?,
                weights("education_weights", mature)?,
            ],
            income: [
                weights("income_weights", high)?,
                weights("income_weights", middle)?,
                weights("income_weights", low)?,
            ],
        })
    }

    /// Draws one couple and labels it with the generic thresholds.
    pub fn generate_one<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<LabeledCouple, ValidationError> {
        let archetype = &ARCHETYPES[self.archetypes.sample(rng)];
        let bias = archetype.bias;

        let male_age = rng.gen_range(archetype.ages.0..=archetype.ages.1);
        let (gap_min, gap_max) = AGE_GAP_BUCKETS[self.age_gaps.sample(rng)];
        let gap = rng.gen_range(gap_min..=gap_max);
        let female_age = if rng.gen_bool(0.5) {
            male_age.saturating_sub(gap).max(MIN_AGE)
        } else {
            (male_age + gap).min(MAX_AGE)
        };

        let civil_status = pick(statuses_for(bias), rng);

        let years_living_together = if civil_status == CivilStatus::LivingIn {
            if male_age < 25 {
                rng.gen_range(1..5)
            } else if male_age < 40 {
                rng.gen_range(1..15)
            } else {
                rng.gen_range(5..25)
            }
        } else {
            0
        };

        let likely_parent = male_age > 25
            && matches!(
                civil_status,
                CivilStatus::LivingIn | CivilStatus::Widowed | CivilStatus::Divorced
            );
        let past_children = rng.gen_bool(if likely_parent { 0.4 } else { 0.1 });
        let children = match (past_children, male_age < 30) {
            (false, _) => 0,
            (true, true) => rng.gen_range(1..3),
            (true, false) => rng.gen_range(1..5),
        };

        let age_band = match male_age {
            0..=24 => 0,
            25..=39 => 1,
            _ => 2,
        };
        let education_level = EDUCATION_LEVELS[self.education[age_band].sample(rng)];
        let income_band = match education_level {
            3..=u8::MAX => 0,
            2 => 1,
            _ => 2,
        };
        let (income_levels, _) = INCOME_BANDS[income_band];
        let income_level = income_levels[self.income[income_band].sample(rng)];

        let profile = CoupleProfile::new(CoupleProfileInput {
            male_age,
            female_age,
            civil_status,
            years_living_together,
            past_children,
            children,
            education_level,
            income_level,
        })?;

        let (disagree, neutral, agree) = answer_probabilities(bias, &profile);
        let answers = WeightedIndex::new([disagree, neutral, agree]).map_err(|e| {
            ValidationError::invalid_format("answer_probabilities", e.to_string())
        })?;
        let scale = [DISAGREE_RESPONSE, NEUTRAL_RESPONSE, AGREE_RESPONSE];
        let values = (0..self.catalog.question_count())
            .map(|_| scale[answers.sample(rng)])
            .collect();
        let responses = QuestionnaireResponse::new(values)?;

        Ok(LabeledCouple::label(
            profile,
            responses,
            self.catalog,
            &GENERIC_RISK_THRESHOLDS,
        ))
    }
}

fn statuses_for(bias: RiskBias) -> &'static [CivilStatus] {
    match bias {
        RiskBias::High => HIGH_BIAS_STATUSES,
        RiskBias::Low => LOW_BIAS_STATUSES,
        RiskBias::Medium => MEDIUM_BIAS_STATUSES,
    }
}

/// Disagree, neutral, and agree probabilities for one couple.
///
/// Starts from the archetype's bias and shifts toward disagreement for
/// wide age gaps, education-income mismatch, and past separations.
fn answer_probabilities(bias: RiskBias, profile: &CoupleProfile) -> (f64, f64, f64) {
    let (mut disagree, mut agree): (f64, f64) = match bias {
        RiskBias::High => (0.4, 0.3),
        RiskBias::Low => (0.1, 0.6),
        RiskBias::Medium => (0.2, 0.4),
    };

    let age_gap = profile.age_gap();
    if age_gap > 10 {
        disagree += 0.2;
        agree -= 0.1;
    } else if age_gap > 5 {
        disagree += 0.1;
        agree -= 0.05;
    }

    if profile.education_income_gap() > 2 {
        disagree += 0.1;
        agree -= 0.05;
    }

    match profile.civil_status() {
        CivilStatus::Separated | CivilStatus::Divorced => {
            disagree += 0.2;
            agree -= 0.1;
        }
        CivilStatus::LivingIn if profile.years_living_together() > 10 => {
            disagree -= 0.1;
            agree += 0.1;
        }
        _ => {}
    }

    let disagree = disagree.clamp(0.05, 0.8);
    let agree = agree.clamp(0.1, 0.8);
    let neutral = (1.0 - disagree - agree).max(0.0);
    (disagree, neutral, agree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn profile(input: CoupleProfileInput) -> CoupleProfile {
        CoupleProfile::new(input).unwrap()
    }

    #[test]
    fn low_bias_favors_agreement() {
        let (d, n, a) = answer_probabilities(RiskBias::Low, &profile(CoupleProfileInput::default()));
        assert!((d - 0.1).abs() < 1e-12);
        assert!((a - 0.6).abs() < 1e-12);
        assert!((n - 0.3).abs() < 1e-12);
    }

    #[test]
    fn adjustments_stack_and_clamp() {
        let p = profile(CoupleProfileInput {
            male_age: 50,
            female_age: 30,
            civil_status: CivilStatus::Divorced,
            education_level: 4,
            income_level: 0,
            ..CoupleProfileInput::default()
        });

        let (d, n, a) = answer_probabilities(RiskBias::High, &p);

        assert!((d - 0.8).abs() < 1e-12);
        assert!((a - 0.1).abs() < 1e-12);
        assert!((n - 0.1).abs() < 1e-9);
    }

    #[test]
    fn long_cohabitation_lowers_disagreement() {
        let p = profile(CoupleProfileInput {
            civil_status: CivilStatus::LivingIn,
            years_living_together: 12,
            ..CoupleProfileInput::default()
        });
        let (d, _, a) = answer_probabilities(RiskBias::Medium, &p);
        assert!((d - 0.1).abs() < 1e-12);
        assert!((a - 0.5).abs() < 1e-12);
    }

    #[test]
    fn generated_couples_respect_profile_invariants() {
        let catalog = Catalog::fallback();
        let generator = GenericGenerator::new(&catalog).unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..200 {
            let couple = generator.generate_one(&mut rng).unwrap();
            let p = &couple.profile;
            assert!((18..=80).contains(&p.male_age()));
            assert!((18..=80).contains(&p.female_age()));
            if p.civil_status() != CivilStatus::LivingIn {
                assert_eq!(p.years_living_together(), 0);
            }
            if !p.past_children() {
                assert_eq!(p.children(), 0);
            }
            assert_eq!(couple.responses.len(), 4);
            assert_eq!(couple.category_scores.len(), 4);
        }
    }

    #[test]
    fn income_follows_education_band() {
        let catalog = Catalog::fallback();
        let generator = GenericGenerator::new(&catalog).unwrap();
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..300 {
            let p = generator.generate_one(&mut rng).unwrap().profile;
            match p.education_level() {
                3..=u8::MAX => assert!((2..=4).contains(&p.income_level())),
                2 => assert!((1..=4).contains(&p.income_level())),
                _ => assert!(p.income_level() <= 3),
            }
        }
    }

    #[test]
    fn weight_tables_are_valid_distributions() {
        assert!(weights("archetype_weights", &ARCHETYPES.map(|a| a.weight)).is_ok());
        for table in &EDUCATION_WEIGHTS {
            assert!(weights("education_weights", table).is_ok());
        }
        for (levels, table) in INCOME_BANDS {
            assert_eq!(levels.len(), table.len());
            assert!(weights("income_weights", table).is_ok());
        }
        assert!(matches!(
            weights("income_weights", &[0.0, 0.0]),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }
}
