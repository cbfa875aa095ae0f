//! Couple module - Demographic profiles and questionnaire answers.
//!
//! # Domain Invariants
//!
//! 1. Both partners are at least 18 years old
//! 2. Years living together is 0 unless the couple is living in
//! 3. Children is 0 unless the couple reports past children
//! 4. Education and income levels are ordinal 0-4
//! 5. Questionnaire answers are 2 (disagree), 3 (neutral) or 4 (agree)

mod profile;
mod responses;

pub use profile::{CivilStatus, CoupleProfile, CoupleProfileInput, MAX_LEVEL, MIN_AGE};
pub use responses::{
    Answer, LengthRepair, QuestionnaireResponse, ResponseLengthError, AGREE_RESPONSE,
    DISAGREE_RESPONSE, NEUTRAL_RESPONSE,
};
