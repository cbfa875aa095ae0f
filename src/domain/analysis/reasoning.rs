//! Reasoning narratives explaining a risk level and a counseling focus.

use crate::domain::couple::{CivilStatus, CoupleProfile};
use crate::domain::foundation::Percentage;

use super::dynamics::PersonalizedFeatures;
use super::labels::RiskLevel;
use super::priority::{FocusCategory, FocusPriority};

const SIGNIFICANT_AGE_GAP: u32 = 10;
const MODERATE_AGE_GAP: u32 = 5;
const LONG_TERM_COHABITATION: u32 = 5;
const HIGH_ALIGNMENT: f64 = 0.7;
const LOW_ALIGNMENT: f64 = 0.4;
const HIGH_CONFLICT: f64 = 0.3;
const LOW_CONFLICT: f64 = 0.1;
const EDUCATION_INCOME_MISMATCH: u8 = 2;
const HIGH_CONFIDENCE: f64 = 0.6;
const MODERATE_CONFIDENCE: f64 = 0.3;

/// Category names listed per counseling reasoning part.
const NAMES_PER_PART: usize = 2;
const MAX_COUNSELING_PARTS: usize = 3;

/// Builds the human-readable reasoning attached to an analysis.
pub struct ReasoningBuilder;

impl ReasoningBuilder {
    /// Explains a risk level from the profile and relationship dynamics.
    ///
    /// High risk cites four factors, Medium and Low cite three.
    pub fn risk_reasoning(
        profile: &CoupleProfile,
        dynamics: &PersonalizedFeatures,
        risk_level: RiskLevel,
    ) -> String {
        let mut parts = Vec::new();

        let gap = profile.age_gap();
        let gap_kind = if gap > SIGNIFICANT_AGE_GAP {
            "Significant"
        } else if gap > MODERATE_AGE_GAP {
            "Moderate"
        } else {
            "Minimal"
        };
        parts.push(format!("{} age gap ({} years) between partners", gap_kind, gap));

        match profile.civil_status() {
            CivilStatus::LivingIn => {
                let years = profile.years_living_together();
                if years > LONG_TERM_COHABITATION {
                    parts.push(format!(
                        "Long-term cohabitation ({} years) with established patterns",
                        years
                    ));
                } else if years > 0 {
                    parts.push(format!(
                        "Recent cohabitation ({} years) with developing patterns",
                        years
                    ));
                }
            }
            status if status.is_previous_relationship() => {
                parts.push(format!(
                    "Previous relationship experience ({}) affecting current dynamics",
                    status
                ));
            }
            _ => {}
        }

        let children = profile.children();
        if profile.past_children() && children > 0 {
            let noun = if children > 1 { "children" } else { "child" };
            parts.push(format!("Parenting experience with {} {}", children, noun));
        }

        let alignment = dynamics.alignment_score;
        let alignment_pct = Percentage::from_fraction(alignment);
        if alignment > HIGH_ALIGNMENT {
            parts.push(format!("High alignment ({}) in MEAI responses", alignment_pct));
        } else if alignment < LOW_ALIGNMENT {
            parts.push(format!(
                "Low alignment ({}) indicating significant disagreements",
                alignment_pct
            ));
        } else {
            parts.push(format!(
                "Moderate alignment ({}) with some areas of agreement",
                alignment_pct
            ));
        }

        let conflict = dynamics.conflict_ratio;
        let conflict_pct = Percentage::from_fraction(conflict);
        if conflict > HIGH_CONFLICT {
            parts.push(format!(
                "High conflict patterns ({} disagreement rate)",
                conflict_pct
            ));
        } else if conflict < LOW_CONFLICT {
            parts.push(format!(
                "Low conflict patterns ({} disagreement rate)",
                conflict_pct
            ));
        }

        if profile.education_income_gap() > EDUCATION_INCOME_MISMATCH {
            parts.push("Significant education-income mismatch affecting compatibility".to_string());
        } else {
            parts.push("Compatible education and income levels".to_string());
        }

        let cited = match risk_level {
            RiskLevel::High => 4,
            RiskLevel::Medium | RiskLevel::Low => 3,
        };
        parts.truncate(cited);

        format!("{} risk assessment based on: {}", risk_level, parts.join("; "))
    }

    /// Explains the counseling focus from category priorities and model confidence.
    ///
    /// Names are taken in the order `focus` lists them.
    pub fn counseling_reasoning(focus: &[FocusCategory], confidence: f64) -> String {
        let mut parts = Vec::new();

        let tiers = [
            (FocusPriority::High, "Critical needs in"),
            (FocusPriority::Moderate, "Development areas in"),
            (FocusPriority::Low, "Strong areas in"),
        ];
        for (priority, heading) in tiers {
            let names: Vec<&str> = focus
                .iter()
                .filter(|c| c.priority == priority)
                .take(NAMES_PER_PART)
                .map(|c| c.name.as_str())
                .collect();
            if !names.is_empty() {
                parts.push(format!("{}: {}", heading, names.join(", ")));
            }
        }

        let confidence_pct = Percentage::from_fraction(confidence);
        let confidence_kind = if confidence > HIGH_CONFIDENCE {
            "High"
        } else if confidence > MODERATE_CONFIDENCE {
            "Moderate"
        } else {
            "Conservative"
        };
        parts.push(format!(
            "{} confidence ({}) in assessment accuracy",
            confidence_kind, confidence_pct
        ));

        parts.truncate(MAX_COUNSELING_PARTS);
        format!("Counseling recommendation based on: {}", parts.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::couple::CoupleProfileInput;

    fn profile(input: CoupleProfileInput) -> CoupleProfile {
        CoupleProfile::new(input).unwrap()
    }

    fn dynamics(alignment: f64, conflict: f64) -> PersonalizedFeatures {
        PersonalizedFeatures {
            alignment_score: alignment,
            conflict_ratio: conflict,
            ..PersonalizedFeatures::default()
        }
    }

    #[test]
    fn high_risk_cites_four_factors() {
        let p = profile(CoupleProfileInput {
            male_age: 45,
            female_age: 30,
            civil_status: CivilStatus::Divorced,
            ..CoupleProfileInput::default()
        });

        let text = ReasoningBuilder::risk_reasoning(&p, &dynamics(0.2, 0.5), RiskLevel::High);

        assert_eq!(
            text,
            "High risk assessment based on: Significant age gap (15 years) between partners; \
             Previous relationship experience (Divorced) affecting current dynamics; \
             Low alignment (20%) indicating significant disagreements; \
             High conflict patterns (50% disagreement rate)"
        );
    }

    #[test]
    fn low_risk_cites_three_factors() {
        let p = profile(CoupleProfileInput::default());
        let text = ReasoningBuilder::risk_reasoning(&p, &dynamics(0.9, 0.0), RiskLevel::Low);

        assert_eq!(
            text,
            "Low risk assessment based on: Minimal age gap (0 years) between partners; \
             High alignment (90%) in MEAI responses; \
             Low conflict patterns (0% disagreement rate)"
        );
    }

    #[test]
    fn cohabitation_and_children_are_cited() {
        let p = profile(CoupleProfileInput {
            male_age: 36,
            female_age: 30,
            civil_status: CivilStatus::LivingIn,
            years_living_together: 8,
            past_children: true,
            children: 1,
            ..CoupleProfileInput::default()
        });

        let text = ReasoningBuilder::risk_reasoning(&p, &dynamics(0.5, 0.2), RiskLevel::High);

        assert!(text.contains("Moderate age gap (6 years)"));
        assert!(text.contains("Long-term cohabitation (8 years)"));
        assert!(text.contains("Parenting experience with 1 child"));
        assert!(text.contains("Moderate alignment (50%)"));
    }

    #[test]
    fn counseling_reasoning_lists_two_names_per_tier() {
        let focus = vec![
            FocusCategory::new("A", 0.9),
            FocusCategory::new("B", 0.8),
            FocusCategory::new("C", 0.7),
            FocusCategory::new("D", 0.5),
        ];

        let text = ReasoningBuilder::counseling_reasoning(&focus, 0.75);

        assert_eq!(
            text,
            "Counseling recommendation based on: Critical needs in: A, B; \
             Development areas in: D; High confidence (75%) in assessment accuracy"
        );
    }

    #[test]
    fn counseling_reasoning_keeps_at_most_three_parts() {
        let focus = vec![
            FocusCategory::new("A", 0.9),
            FocusCategory::new("B", 0.5),
            FocusCategory::new("C", 0.1),
        ];

        let text = ReasoningBuilder::counseling_reasoning(&focus, 0.2);

        assert_eq!(
            text,
            "Counseling recommendation based on: Critical needs in: A; \
             Development areas in: B; Strong areas in: C"
        );
    }

    #[test]
    fn conservative_confidence_when_low() {
        let text = ReasoningBuilder::counseling_reasoning(&[], 0.25);
        assert_eq!(
            text,
            "Counseling recommendation based on: Conservative confidence (25%) in assessment accuracy"
        );
    }
}
