//! Rule-based recommendation narrator.
//!
//! Output order: risk headline, alignment, harmony, conflict (with a crisis
//! line for high-risk, high-conflict couples), partner commentary that only
//! appears past significance thresholds, category severity, and response
//! variance. The list is capped at `MAX_RECOMMENDATIONS`.

use crate::domain::analysis::{RiskLevel, SeverityTier};
use crate::domain::foundation::Percentage;

use super::context::RecommendationContext;

/// Most recommendations returned for one couple.
pub const MAX_RECOMMENDATIONS: usize = 8;

const CRISIS_CONFLICT: f64 = 0.4;
const DOMINANT_ABOVE: f64 = 1.5;
const DOMINATED_BELOW: f64 = 0.3;
const DOMINANCE_ALIGNMENT_CEILING: f64 = 0.8;
const INCONSISTENT_BELOW: f64 = 0.3;
const UNCERTAIN_BELOW: f64 = 0.6;
const POSITIVE_ABOVE: f64 = 0.7;
const CONCERNED_BELOW: f64 = 0.3;

fn pct(fraction: f64) -> Percentage {
    Percentage::from_fraction(fraction)
}

/// Deterministic narrator used directly or as the fallback for external generators.
pub struct RuleBasedNarrator;

impl RuleBasedNarrator {
    pub fn generate(context: &RecommendationContext) -> Vec<String> {
        let dynamics = &context.dynamics;
        let mut recommendations = Vec::new();

        recommendations.push(risk_headline(context.risk_level).to_string());
        recommendations.push(alignment_line(dynamics.alignment_score));
        recommendations.push(harmony_line(context.couple_optimism()));
        recommendations.push(conflict_line(dynamics.conflict_ratio));
        if context.risk_level == RiskLevel::High && dynamics.conflict_ratio > CRISIS_CONFLICT {
            recommendations.push(format!(
                "CRISIS INTERVENTION: {} conflict rate - immediate mediation or specialized counseling required",
                pct(dynamics.conflict_ratio)
            ));
        }

        recommendations.extend(dominance_line(context));
        recommendations.extend(consistency_line("MALE", "male", dynamics.male_consistency));
        recommendations.extend(consistency_line(
            "FEMALE",
            "female",
            dynamics.female_consistency,
        ));
        recommendations.extend(
            context
                .male_positive_ratio()
                .and_then(|r| positivity_line("MALE", "Male", r)),
        );
        recommendations.extend(
            context
                .female_positive_ratio()
                .and_then(|r| positivity_line("FEMALE", "Female", r)),
        );

        for category in &context.focus_categories {
            recommendations.extend(category_line(&category.name, category.score));
        }

        recommendations.push(variance_line(dynamics.response_variance));

        recommendations.truncate(MAX_RECOMMENDATIONS);
        recommendations
    }
}

fn risk_headline(risk_level: RiskLevel) -> &'static str {
    match risk_level {
        RiskLevel::High => "HIGH RISK PROFILE: Intensive counseling required - focus on core relationship issues, communication, and conflict resolution",
        RiskLevel::Medium => "MEDIUM RISK PROFILE: Proactive counseling recommended - address identified issues before they escalate into major problems",
        RiskLevel::Low => "LOW RISK PROFILE: Preventive counseling - maintain healthy relationship patterns and continue building strong foundations",
    }
}

fn alignment_line(alignment: f64) -> String {
    if alignment < 0.3 {
        format!(
            "CRITICAL ALIGNMENT: Only {} agreement detected - immediate relationship counseling required",
            pct(alignment)
        )
    } else if alignment < 0.5 {
        format!(
            "SIGNIFICANT DISAGREEMENT: {} disagreement on key issues - structured communication therapy needed",
            pct(1.0 - alignment)
        )
    } else if alignment < 0.7 {
        format!(
            "MODERATE ALIGNMENT: {} agreement - focus on understanding different perspectives",
            pct(alignment)
        )
    } else {
        format!(
            "STRONG ALIGNMENT: {} agreement - continue building on shared values and goals",
            pct(alignment)
        )
    }
}

fn harmony_line(optimism: f64) -> String {
    if optimism > 0.7 {
        format!(
            "EXCELLENT HARMONY: {} positive responses - maintain current healthy communication patterns",
            pct(optimism)
        )
    } else if optimism > 0.5 {
        format!(
            "GOOD HARMONY: {} positive responses - good foundation with room for growth",
            pct(optimism)
        )
    } else if optimism > 0.3 {
        format!(
            "MODERATE HARMONY: {} positive responses - focus on building shared positive perspectives",
            pct(optimism)
        )
    } else {
        format!(
            "CONCERNING HARMONY: Only {} positive responses - intensive counseling needed to address underlying concerns",
            pct(optimism)
        )
    }
}

fn conflict_line(conflict: f64) -> String {
    if conflict > 0.5 {
        format!(
            "HIGH CONFLICT: {} of responses show major disagreement - intensive conflict resolution counseling required",
            pct(conflict)
        )
    } else if conflict > 0.3 {
        format!(
            "MODERATE CONFLICT: {} disagreement detected - mediation and communication skills training recommended",
            pct(conflict)
        )
    } else if conflict > 0.1 {
        format!(
            "MINOR CONFLICTS: {} disagreement - focus on conflict prevention strategies",
            pct(conflict)
        )
    } else {
        format!(
            "LOW CONFLICT: Only {} disagreement - maintain current healthy communication patterns",
            pct(conflict)
        )
    }
}

fn dominance_line(context: &RecommendationContext) -> Option<String> {
    let d = &context.dynamics;
    let imbalanced = d.power_balance > DOMINANT_ABOVE || d.power_balance < DOMINATED_BELOW;
    if !imbalanced || d.alignment_score >= DOMINANCE_ALIGNMENT_CEILING {
        return None;
    }
    Some(if d.male_avg_response > d.female_avg_response {
        format!(
            "MALE DOMINANCE: Male partner shows {:.1} vs female {:.1} average - ensure balanced decision-making and equal voice",
            d.male_avg_response, d.female_avg_response
        )
    } else {
        format!(
            "FEMALE DOMINANCE: Female partner shows {:.1} vs male {:.1} average - ensure balanced decision-making and equal voice",
            d.female_avg_response, d.male_avg_response
        )
    })
}

fn consistency_line(tag: &str, partner: &str, consistency: f64) -> Option<String> {
    if consistency < INCONSISTENT_BELOW {
        Some(format!(
            "{} INCONSISTENCY: {} consistency - {} partner needs individual counseling to clarify values and goals",
            tag,
            pct(consistency),
            partner
        ))
    } else if consistency < UNCERTAIN_BELOW {
        Some(format!(
            "{} UNCERTAINTY: {} consistency - {} partner may benefit from values clarification sessions",
            tag,
            pct(consistency),
            partner
        ))
    } else {
        None
    }
}

fn positivity_line(tag: &str, partner: &str, ratio: f64) -> Option<String> {
    if ratio > POSITIVE_ABOVE {
        Some(format!(
            "{} POSITIVE: {} partner shows {} positive responses - excellent engagement and optimism",
            tag,
            partner,
            pct(ratio)
        ))
    } else if ratio < CONCERNED_BELOW {
        Some(format!(
            "{} CONCERNS: {} partner shows only {} positive responses - individual counseling recommended",
            tag,
            partner,
            pct(ratio)
        ))
    } else {
        None
    }
}

#[derive(Clone, Copy)]
enum Theme {
    Marriage,
    Family,
    Health,
    Other,
}

impl Theme {
    fn of(name: &str) -> Self {
        if name.contains("Marriage") {
            Theme::Marriage
        } else if name.contains("Family") {
            Theme::Family
        } else if name.contains("Health") {
            Theme::Health
        } else {
            Theme::Other
        }
    }
}

fn category_line(name: &str, score: f64) -> Option<String> {
    let tier = SeverityTier::from_score(score);
    let (heading, advice) = match (tier, Theme::of(name)) {
        (SeverityTier::Low, _) => return None,
        (SeverityTier::Critical, Theme::Marriage) => (
            "CRITICAL MARRIAGE FOCUS",
            "immediate relationship foundation counseling required",
        ),
        (SeverityTier::Critical, Theme::Family) => (
            "CRITICAL FAMILY PLANNING",
            "intensive family planning and parenting preparation needed",
        ),
        (SeverityTier::Critical, Theme::Health) => (
            "CRITICAL HEALTH FOCUS",
            "immediate health and wellness counseling required",
        ),
        (SeverityTier::Critical, Theme::Other) => {
            ("CRITICAL FOCUS", "immediate targeted counseling required")
        }
        (SeverityTier::High, Theme::Marriage) => (
            "HIGH MARRIAGE PRIORITY",
            "relationship foundation counseling recommended",
        ),
        (SeverityTier::High, Theme::Family) => {
            ("HIGH FAMILY PRIORITY", "family planning counseling recommended")
        }
        (SeverityTier::High, Theme::Health) => (
            "HIGH HEALTH PRIORITY",
            "health and wellness counseling recommended",
        ),
        (SeverityTier::High, Theme::Other) => ("HIGH PRIORITY", "targeted counseling recommended"),
        (SeverityTier::Moderate, Theme::Marriage) => {
            ("MODERATE MARRIAGE FOCUS", "relationship development sessions")
        }
        (SeverityTier::Moderate, Theme::Family) => {
            ("MODERATE FAMILY FOCUS", "family planning education")
        }
        (SeverityTier::Moderate, Theme::Health) => {
            ("MODERATE HEALTH FOCUS", "health awareness sessions")
        }
        (SeverityTier::Moderate, Theme::Other) => ("MODERATE FOCUS", "educational sessions"),
    };
    Some(format!("{}: {} at {} - {}", heading, name, pct(score), advice))
}

fn variance_line(variance: f64) -> String {
    if variance > 2.5 {
        format!(
            "COMPLEX DYNAMICS: High variance ({:.1}) suggests complex relationship patterns - comprehensive assessment and specialized counseling needed",
            variance
        )
    } else if variance > 1.5 {
        format!(
            "VARIED RESPONSES: Moderate variance ({:.1}) indicates diverse perspectives - structured communication training recommended",
            variance
        )
    } else if variance > 0.5 {
        format!(
            "BALANCED DIVERSITY: Healthy variance ({:.1}) shows good relationship complexity - continue current approach",
            variance
        )
    } else {
        format!(
            "CONSISTENT PATTERNS: Low variance ({:.1}) indicates stable relationship dynamics - maintain current healthy patterns",
            variance
        )
    }
}
