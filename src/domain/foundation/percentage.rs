//! Whole-number percentages for report text.

use std::fmt;

/// A fraction rendered as a whole percentage, e.g. `42%`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Percentage(u8);

impl Percentage {
    /// Converts a fraction to a whole percentage, truncating toward zero.
    ///
    /// Fractions outside 0.0..=1.0 are clamped; NaN maps to zero.
    pub fn from_fraction(fraction: f64) -> Self {
        if fraction.is_nan() {
            return Self(0);
        }
        Self((fraction.clamp(0.0, 1.0) * 100.0).trunc() as u8)
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}
