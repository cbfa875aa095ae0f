//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, percentages, errors)
//! - `catalog` - Question catalog and question → category mapping
//! - `couple` - Couple profiles and questionnaire responses
//! - `analysis` - Pure services: dynamics, feature vectors, labels, tiers, reasoning
//! - `synthetic` - Synthetic training populations
//! - `model` - Random forests, trainer, predictor, artifact set
//! - `recommendation` - Narrative recommendations

pub mod analysis;
pub mod catalog;
pub mod couple;
pub mod foundation;
pub mod model;
pub mod recommendation;
pub mod synthetic;
