//! Synthetic couples patterned on observed couples.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use rand_distr::StandardNormal;

use crate::domain::analysis::OBSERVED_RISK_THRESHOLDS;
use crate::domain::catalog::Catalog;
use crate::domain::couple::{
    CivilStatus, CoupleProfile, CoupleProfileInput, QuestionnaireResponse, AGREE_RESPONSE,
    DISAGREE_RESPONSE,
};
use crate::domain::foundation::ValidationError;

use super::{pick, LabeledCouple};

const MIN_AGE: u32 = 18;
const MAX_AGE: u32 = 80;

/// Per-answer perturbation of -1, 0, or +1.
const ANSWER_NOISE: [i8; 3] = [-1, 0, 1];
const ANSWER_NOISE_WEIGHTS: [f64; 3] = [0.1, 0.8, 0.1];

const PAST_CHILDREN_GATE: f64 = 0.4;
const PAST_CHILDREN_PROBABILITY: f64 = 0.3;

/// Mean and population standard deviation.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Moments {
    mean: f64,
    std_dev: f64,
}

impl Moments {
    fn of(values: &[f64]) -> Self {
        let n = values.len().max(1) as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Self {
            mean,
            std_dev: variance.sqrt(),
        }
    }

    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let z: f64 = StandardNormal.sample(rng);
        self.mean + self.std_dev * z
    }
}

/// Linearly interpolated percentile of `values`, `q` in [0, 100].
fn percentile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let rank = (q / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Generator that resamples and perturbs observed couples.
pub struct PatternedGenerator<'a> {
    catalog: &'a Catalog,
    observed: &'a [LabeledCouple],
    male_ages: Moments,
    female_ages: Moments,
    large_gap: f64,
    mean_years_together: u32,
    civil_statuses: Vec<CivilStatus>,
    children: Vec<u32>,
    education_levels: Vec<u8>,
    income_levels: Vec<u8>,
    noise: WeightedIndex<f64>,
}

impl<'a> PatternedGenerator<'a> {
    /// Builds the empirical distributions. Returns `None` when nothing was observed.
    pub fn new(catalog: &'a Catalog, observed: &'a [LabeledCouple]) -> Option<Self> {
        if observed.is_empty() {
            return None;
        }
        let profiles: Vec<&CoupleProfile> = observed.iter().map(|c| &c.profile).collect();

        let male: Vec<f64> = profiles.iter().map(|p| f64::from(p.male_age())).collect();
        let female: Vec<f64> = profiles.iter().map(|p| f64::from(p.female_age())).collect();
        let gaps: Vec<f64> = profiles.iter().map(|p| f64::from(p.age_gap())).collect();
        let years: Vec<f64> = profiles
            .iter()
            .map(|p| f64::from(p.years_living_together()))
            .collect();

        Some(Self {
            catalog,
            observed,
            male_ages: Moments::of(&male),
            female_ages: Moments::of(&female),
            large_gap: percentile(&gaps, 90.0),
            mean_years_together: Moments::of(&years).mean as u32,
            civil_statuses: profiles.iter().map(|p| p.civil_status()).collect(),
            children: profiles.iter().map(|p| p.children()).collect(),
            education_levels: profiles.iter().map(|p| p.education_level()).collect(),
            income_levels: profiles.iter().map(|p| p.income_level()).collect(),
            noise: WeightedIndex::new(ANSWER_NOISE_WEIGHTS).ok()?,
        })
    }

    /// Draws one couple and labels it with the observed-couple thresholds.
    pub fn generate_one<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<LabeledCouple, ValidationError> {
        let base = &self.observed[rng.gen_range(0..self.observed.len())];

        let mut male_age = draw_age(&self.male_ages, rng);
        let mut female_age = draw_age(&self.female_ages, rng);
        if f64::from(base.profile.age_gap()) >= self.large_gap {
            (male_age, female_age) = keep_reference_gap(&base.profile, male_age, female_age);
        }

        let civil_status = pick(&self.civil_statuses, rng);
        let years_living_together = if civil_status == CivilStatus::LivingIn {
            rng.gen_range(1..self.mean_years_together + 5)
        } else {
            0
        };

        let past_children =
            rng.gen::<f64>() < PAST_CHILDREN_GATE && rng.gen_bool(PAST_CHILDREN_PROBABILITY);
        let children = if past_children {
            pick(&self.children, rng)
        } else {
            0
        };

        let education_level = pick(&self.education_levels, rng);
        let income_level = pick(&self.income_levels, rng);

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

        let values = base
            .responses
            .values()
            .iter()
            .map(|&answer| {
                let shifted = i16::from(answer) + i16::from(ANSWER_NOISE[self.noise.sample(rng)]);
                shifted.clamp(i16::from(DISAGREE_RESPONSE), i16::from(AGREE_RESPONSE)) as u8
            })
            .collect();
        let responses = QuestionnaireResponse::new(values)?;

        Ok(LabeledCouple::label(
            profile,
            responses,
            self.catalog,
            &OBSERVED_RISK_THRESHOLDS,
        ))
    }
}

/// Re-spaces a drawn pair so it carries the reference couple's age gap.
///
/// The partner who is older in the reference keeps the drawn age and the
/// younger one is placed `gap` years below. The older age is raised only as
/// far as needed to keep the younger partner at `MIN_AGE`.
fn keep_reference_gap(reference: &CoupleProfile, male_age: u32, female_age: u32) -> (u32, u32) {
    let gap = reference.age_gap().min(MAX_AGE - MIN_AGE);
    if reference.male_age() >= reference.female_age() {
        let male = male_age.max(MIN_AGE + gap);
        (male, male - gap)
    } else {
        let female = female_age.max(MIN_AGE + gap);
        (female - gap, female)
    }
}

fn draw_age<R: Rng + ?Sized>(moments: &Moments, rng: &mut R) -> u32 {
    // Truncate toward zero before clamping.
    let age = moments.draw(rng).trunc();
    age.clamp(f64::from(MIN_AGE), f64::from(MAX_AGE)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analysis::RiskLevel;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn observed_couple(catalog: &Catalog, male_age: u32, female_age: u32, answers: Vec<u8>) -> LabeledCouple {
        let profile = CoupleProfile::new(CoupleProfileInput {
            male_age,
            female_age,
            civil_status: CivilStatus::LivingIn,
            years_living_together: 4,
            past_children: true,
            children: 2,
            education_level: 3,
            income_level: 3,
        })
        .unwrap();
        LabeledCouple::label(
            profile,
            QuestionnaireResponse::new(answers).unwrap(),
            catalog,
            &OBSERVED_RISK_THRESHOLDS,
        )
    }

    #[test]
    fn percentile_interpolates_linearly() {
        assert!((percentile(&[1.0, 2.0, 3.0, 4.0, 5.0], 90.0) - 4.6).abs() < 1e-9);
        assert_eq!(percentile(&[7.0], 90.0), 7.0);
        assert_eq!(percentile(&[], 90.0), 0.0);
    }

    #[test]
    fn moments_use_population_std() {
        let m = Moments::of(&[2.0, 4.0]);
        assert_eq!(m.mean, 3.0);
        assert_eq!(m.std_dev, 1.0);
    }

    #[test]
    fn empty_observations_yield_no_generator() {
        let catalog = Catalog::fallback();
        assert!(PatternedGenerator::new(&catalog, &[]).is_none());
    }

    #[test]
    fn draws_stay_near_observed_patterns() {
        let catalog = Catalog::fallback();
        let observed = vec![
            observed_couple(&catalog, 30, 28, vec![4, 4, 4, 4]),
            observed_couple(&catalog, 34, 31, vec![4, 4, 3, 4]),
        ];
        let generator = PatternedGenerator::new(&catalog, &observed).unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..100 {
            let couple = generator.generate_one(&mut rng).unwrap();
            let p = &couple.profile;
            assert!((18..=80).contains(&p.male_age()));
            assert_eq!(p.civil_status(), CivilStatus::LivingIn);
            assert!((1..9).contains(&p.years_living_together()));
            assert_eq!(p.education_level(), 3);
            if p.past_children() {
                assert_eq!(p.children(), 2);
            }
            assert!(couple.responses.values().iter().all(|v| (2..=4).contains(v)));
            assert_eq!(couple.responses.len(), 4);
        }
    }

    #[test]
    fn noise_is_mostly_zero() {
        let catalog = Catalog::fallback();
        let observed = vec![observed_couple(&catalog, 30, 30, vec![3, 3, 3, 3])];
        let generator = PatternedGenerator::new(&catalog, &observed).unwrap();
        let mut rng = StdRng::seed_from_u64(9);

        let mut unchanged = 0;
        let mut total = 0;
        for _ in 0..250 {
            let couple = generator.generate_one(&mut rng).unwrap();
            unchanged += couple.responses.values().iter().filter(|&&v| v == 3).count();
            total += couple.responses.len();
        }
        let ratio = unchanged as f64 / total as f64;
        assert!((0.7..0.9).contains(&ratio), "ratio was {}", ratio);
    }

    #[test]
    fn labels_use_observed_thresholds() {
        let catalog = Catalog::fallback();
        let observed = vec![observed_couple(&catalog, 30, 30, vec![2, 2, 2, 2])];
        let generator = PatternedGenerator::new(&catalog, &observed).unwrap();
        let mut rng = StdRng::seed_from_u64(3);

        let couple = generator.generate_one(&mut rng).unwrap();
        let ratio = couple.responses.disagree_ratio();
        assert_eq!(couple.risk_level, OBSERVED_RISK_THRESHOLDS.classify(ratio));
        assert_ne!(couple.risk_level, RiskLevel::Low);
    }

    #[test]
    fn reference_gap_moves_the_younger_partner_down() {
        let catalog = Catalog::fallback();
        let older_male = observed_couple(&catalog, 60, 20, vec![3, 3, 3, 3]).profile;
        let older_female = observed_couple(&catalog, 25, 45, vec![3, 3, 3, 3]).profile;

        assert_eq!(keep_reference_gap(&older_male, 65, 40), (65, 25));
        assert_eq!(keep_reference_gap(&older_female, 30, 50), (30, 50));
        assert_eq!(keep_reference_gap(&older_female, 40, 62), (42, 62));
    }

    #[test]
    fn reference_gap_never_pushes_below_min_age() {
        let catalog = Catalog::fallback();
        let reference = observed_couple(&catalog, 60, 20, vec![3, 3, 3, 3]).profile;

        assert_eq!(keep_reference_gap(&reference, 30, 29), (58, 18));
    }

    #[test]
    fn large_gap_references_keep_their_gap() {
        let catalog = Catalog::fallback();
        let observed = vec![
            observed_couple(&catalog, 30, 28, vec![4, 4, 4, 4]),
            observed_couple(&catalog, 32, 30, vec![4, 4, 4, 4]),
            observed_couple(&catalog, 31, 29, vec![4, 4, 4, 4]),
            observed_couple(&catalog, 60, 20, vec![4, 4, 4, 4]),
        ];
        let generator = PatternedGenerator::new(&catalog, &observed).unwrap();
        assert!((generator.large_gap - 28.6).abs() < 1e-9);
        let mut rng = StdRng::seed_from_u64(17);

        let mut wide = 0;
        for _ in 0..400 {
            let p = generator.generate_one(&mut rng).unwrap().profile;
            assert!(p.male_age().min(p.female_age()) >= MIN_AGE);
            assert!(p.male_age().max(p.female_age()) <= MAX_AGE);
            if f64::from(p.age_gap()) >= generator.large_gap {
                wide += 1;
            }
        }
        // One reference in four has the wide gap
        assert!(wide >= 60, "only {} wide-gap couples", wide);
    }
}
