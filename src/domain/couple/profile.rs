//! Couple demographic profile.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Minimum age of either partner.
pub const MIN_AGE: u32 = 18;

/// Upper bound accepted for a partner's age.
pub const MAX_AGE: u32 = 120;

/// Highest ordinal for education and income levels.
pub const MAX_LEVEL: u8 = 4;

/// Civil status of the couple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CivilStatus {
    #[default]
    Single,
    #[serde(rename = "Living In")]
    LivingIn,
    Widowed,
    Separated,
    Divorced,
}

impl CivilStatus {
    /// All statuses in declaration order.
    pub const ALL: [CivilStatus; 5] = [
        CivilStatus::Single,
        CivilStatus::LivingIn,
        CivilStatus::Widowed,
        CivilStatus::Separated,
        CivilStatus::Divorced,
    ];

    /// Returns the display label for this status.
    pub fn label(&self) -> &'static str {
        match self {
            CivilStatus::Single => "Single",
            CivilStatus::LivingIn => "Living In",
            CivilStatus::Widowed => "Widowed",
            CivilStatus::Separated => "Separated",
            CivilStatus::Divorced => "Divorced",
        }
    }

    /// True for statuses that imply an earlier relationship ended.
    pub fn is_previous_relationship(&self) -> bool {
        matches!(
            self,
            CivilStatus::Widowed | CivilStatus::Separated | CivilStatus::Divorced
        )
    }
}

impl fmt::Display for CivilStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CivilStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CivilStatus::ALL
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                ValidationError::invalid_format("civil_status", format!("unknown value '{}'", s))
            })
    }
}

/// Raw demographic fields as supplied by a caller or a store.
///
/// Missing fields fall back to the defaults of an average couple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoupleProfileInput {
    #[serde(default = "default_age")]
    pub male_age: u32,
    #[serde(default = "default_age")]
    pub female_age: u32,
    #[serde(default)]
    pub civil_status: CivilStatus,
    #[serde(default)]
    pub years_living_together: u32,
    #[serde(default)]
    pub past_children: bool,
    #[serde(default)]
    pub children: u32,
    #[serde(default = "default_level")]
    pub education_level: u8,
    #[serde(default = "default_level")]
    pub income_level: u8,
}

impl Default for CoupleProfileInput {
    fn default() -> Self {
        Self {
            male_age: default_age(),
            female_age: default_age(),
            civil_status: CivilStatus::default(),
            years_living_together: 0,
            past_children: false,
            children: 0,
            education_level: default_level(),
            income_level: default_level(),
        }
    }
}

fn default_age() -> u32 {
    30
}

fn default_level() -> u8 {
    2
}

/// Validated, normalized demographic snapshot of a couple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoupleProfile {
    male_age: u32,
    female_age: u32,
    civil_status: CivilStatus,
    years_living_together: u32,
    past_children: bool,
    children: u32,
    education_level: u8,
    income_level: u8,
}

impl CoupleProfile {
    /// Validates and normalizes raw profile fields.
    ///
    /// Years living together is forced to 0 unless the couple is living in,
    /// and children is forced to 0 unless past children are reported.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::OutOfRange` for ages outside 18-120 or
    /// levels above 4.
    pub fn new(input: CoupleProfileInput) -> Result<Self, ValidationError> {
        check_age("male_age", input.male_age)?;
        check_age("female_age", input.female_age)?;
        check_level("education_level", input.education_level)?;
        check_level("income_level", input.income_level)?;

        let years_living_together = if input.civil_status == CivilStatus::LivingIn {
            input.years_living_together
        } else {
            0
        };
        let children = if input.past_children { input.children } else { 0 };

        Ok(Self {
            male_age: input.male_age,
            female_age: input.female_age,
            civil_status: input.civil_status,
            years_living_together,
            past_children: input.past_children,
            children,
            education_level: input.education_level,
            income_level: input.income_level,
        })
    }

    pub fn male_age(&self) -> u32 {
        self.male_age
    }

    pub fn female_age(&self) -> u32 {
        self.female_age
    }

    pub fn civil_status(&self) -> CivilStatus {
        self.civil_status
    }

    pub fn years_living_together(&self) -> u32 {
        self.years_living_together
    }

    pub fn past_children(&self) -> bool {
        self.past_children
    }

    pub fn children(&self) -> u32 {
        self.children
    }

    pub fn education_level(&self) -> u8 {
        self.education_level
    }

    pub fn income_level(&self) -> u8 {
        self.income_level
    }

    /// Absolute age difference between partners, in years.
    pub fn age_gap(&self) -> u32 {
        self.male_age.abs_diff(self.female_age)
    }

    /// Absolute difference between education and income ordinals.
    pub fn education_income_gap(&self) -> u8 {
        self.education_level.abs_diff(self.income_level)
    }

    /// The six demographic features in model order.
    pub fn demographic_features(&self) -> [f64; 6] {
        [
            f64::from(self.male_age),
            f64::from(self.female_age),
            f64::from(self.years_living_together),
            f64::from(self.children),
            f64::from(self.education_level),
            f64::from(self.income_level),
        ]
    }
}

impl TryFrom<CoupleProfileInput> for CoupleProfile {
    type Error = ValidationError;

    fn try_from(input: CoupleProfileInput) -> Result<Self, Self::Error> {
        Self::new(input)
    }
}

fn check_age(field: &str, age: u32) -> Result<(), ValidationError> {
    if !(MIN_AGE..=MAX_AGE).contains(&age) {
        return Err(ValidationError::out_of_range(
            field,
            i64::from(MIN_AGE),
            i64::from(MAX_AGE),
            i64::from(age),
        ));
    }
    Ok(())
}

fn check_level(field: &str, level: u8) -> Result<(), ValidationError> {
    if level > MAX_LEVEL {
        return Err(ValidationError::out_of_range(
            field,
            0,
            i64::from(MAX_LEVEL),
            i64::from(level),
        ));
    }
    Ok(())
}
