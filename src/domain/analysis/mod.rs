//! Analysis Module - Pure domain services for couple analysis.
//!
//! # Components
//!
//! - `DynamicsCalculator` - Relationship dynamics from paired partner answers
//! - `FeatureAssembler` - Fixed-order feature vectors shared by both models
//! - `RiskThresholds` / `category_scores` - Labels derived from raw responses
//! - `FocusPriority` / `SeverityTier` - Display and narrative tiers
//! - `ReasoningBuilder` - Risk and counseling reasoning text
//!
//! All functions are pure and stateless. No ports or adapters are needed.

mod dynamics;
mod features;
mod labels;
mod priority;
mod reasoning;

pub use dynamics::{DynamicsCalculator, PersonalizedFeatures};
pub use features::{
    feature_count, AssembledFeatures, FeatureAssembler, FeatureLengthMismatch, FeatureVector,
    DEMOGRAPHIC_FEATURE_COUNT, PERSONALIZED_FEATURE_COUNT,
};
pub use labels::{
    category_scores, RiskLevel, RiskThresholds, GENERIC_RISK_THRESHOLDS,
    OBSERVED_RISK_THRESHOLDS, UNSCORED_CATEGORY,
};
pub use priority::{focus_categories, FocusCategory, FocusPriority, SeverityTier};
pub use reasoning::ReasoningBuilder;
