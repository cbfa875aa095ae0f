//! Priority tiers for category scores.
//!
//! Two independent schemes exist. `FocusPriority` (three tiers) labels the
//! focus categories shown to callers; `SeverityTier` (four tiers) picks the
//! wording of category recommendations. They do not share cut points.

use serde::{Deserialize, Serialize};

use crate::domain::catalog::Catalog;

/// Display priority of a focus category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FocusPriority {
    Low,
    Moderate,
    High,
}

impl FocusPriority {
    /// Scores above this are High.
    pub const HIGH_ABOVE: f64 = 0.6;
    /// Scores above this (and not High) are Moderate.
    pub const MODERATE_ABOVE: f64 = 0.3;

    pub fn from_score(score: f64) -> Self {
        if score > Self::HIGH_ABOVE {
            FocusPriority::High
        } else if score > Self::MODERATE_ABOVE {
            FocusPriority::Moderate
        } else {
            FocusPriority::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FocusPriority::Low => "Low",
            FocusPriority::Moderate => "Moderate",
            FocusPriority::High => "High",
        }
    }
}

/// Narrative severity of a category score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SeverityTier {
    Low,
    Moderate,
    High,
    Critical,
}

impl SeverityTier {
    pub const CRITICAL_ABOVE: f64 = 0.7;
    pub const HIGH_ABOVE: f64 = 0.4;
    pub const MODERATE_ABOVE: f64 = 0.2;

    pub fn from_score(score: f64) -> Self {
        if score > Self::CRITICAL_ABOVE {
            SeverityTier::Critical
        } else if score > Self::HIGH_ABOVE {
            SeverityTier::High
        } else if score > Self::MODERATE_ABOVE {
            SeverityTier::Moderate
        } else {
            SeverityTier::Low
        }
    }
}

/// A scored category as presented to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusCategory {
    pub name: String,
    pub score: f64,
    pub priority: FocusPriority,
}

impl FocusCategory {
    pub fn new(name: impl Into<String>, score: f64) -> Self {
        Self {
            name: name.into(),
            score,
            priority: FocusPriority::from_score(score),
        }
    }
}

/// Pairs every catalog category with its score, highest score first.
///
/// Ties keep catalog order. Missing scores are treated as 0.
pub fn focus_categories(catalog: &Catalog, scores: &[f64]) -> Vec<FocusCategory> {
    let mut categories: Vec<FocusCategory> = catalog
        .categories()
        .iter()
        .enumerate()
        .map(|(i, name)| FocusCategory::new(name.clone(), scores.get(i).copied().unwrap_or(0.0)))
        .collect();
    categories.sort_by(|a, b| b.score.total_cmp(&a.score));
    categories
}
