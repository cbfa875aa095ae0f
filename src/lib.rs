//! MEAI Counsel - Relationship risk assessment and counseling recommendations
//!
//! This crate scores couples' MEAI questionnaire answers with a random
//! forest risk classifier and a multi-output category regressor, and turns
//! the result into reasoning text and counseling recommendations.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
