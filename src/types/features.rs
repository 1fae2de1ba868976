//! Input types on both sides of the model boundary
//!
//! `RawUserInput` is what the client form collects; `FeatureRecord` is the
//! exact row the model consumes. `features::FeatureRules` bridges the two.

use crate::errors::{RiskError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

/// Accepted age range on the client form
pub const AGE_RANGE: RangeInclusive<u32> = 18..=100;

/// Accepted weight range (kg)
pub const WEIGHT_RANGE: RangeInclusive<f64> = 30.0..=200.0;

/// Accepted height range (m)
pub const HEIGHT_RANGE: RangeInclusive<f64> = 0.5..=2.5;

/// Accepted annual income range (lakh per annum)
pub const INCOME_RANGE: RangeInclusive<f64> = 0.0..=100.0;

/// One row of model input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeatureRecord {
    pub bmi: f64,
    pub age_group: String,
    pub lifestyle_risk: String,
    pub city_tier: String,
    pub income_lpa: f64,
    pub occupation: String,
}

/// Borrowed view of one feature value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureValue<'a> {
    Numeric(f64),
    Categorical(&'a str),
}

impl FeatureRecord {
    /// Names of every field, in declaration order
    pub const FIELDS: [&'static str; 6] = [
        "bmi",
        "age_group",
        "lifestyle_risk",
        "city_tier",
        "income_lpa",
        "occupation",
    ];

    /// Look a feature up by its schema name
    pub fn value(&self, name: &str) -> Option<FeatureValue<'_>> {
        match name {
            "bmi" => Some(FeatureValue::Numeric(self.bmi)),
            "income_lpa" => Some(FeatureValue::Numeric(self.income_lpa)),
            "age_group" => Some(FeatureValue::Categorical(&self.age_group)),
            "lifestyle_risk" => Some(FeatureValue::Categorical(&self.lifestyle_risk)),
            "city_tier" => Some(FeatureValue::Categorical(&self.city_tier)),
            "occupation" => Some(FeatureValue::Categorical(&self.occupation)),
            _ => None,
        }
    }

    /// Whether `name` is a numeric field (false for categorical or unknown)
    pub fn is_numeric_field(name: &str) -> bool {
        matches!(name, "bmi" | "income_lpa")
    }
}

/// Occupations offered by the client form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Occupation {
    Student,
    PrivateJob,
    GovernmentJob,
    BusinessOwner,
    Freelancer,
    Unemployed,
    Retired,
}

impl Occupation {
    pub const ALL: [Occupation; 7] = [
        Occupation::Student,
        Occupation::PrivateJob,
        Occupation::GovernmentJob,
        Occupation::BusinessOwner,
        Occupation::Freelancer,
        Occupation::Unemployed,
        Occupation::Retired,
    ];

    /// Label shown on the form
    pub fn display_name(&self) -> &'static str {
        match self {
            Occupation::Student => "Student",
            Occupation::PrivateJob => "Private Job",
            Occupation::GovernmentJob => "Government Job",
            Occupation::BusinessOwner => "Business Owner",
            Occupation::Freelancer => "Freelancer",
            Occupation::Unemployed => "Unemployed",
            Occupation::Retired => "Retired",
        }
    }

    /// Canonical token sent to the model
    pub fn token(&self) -> String {
        normalize_token(self.display_name())
    }

    /// Parse free text ("Private Job", "private_job", " private  job ")
    pub fn parse(text: &str) -> Result<Self> {
        let token = normalize_token(text);
        Self::ALL
            .iter()
            .copied()
            .find(|o| o.token() == token)
            .ok_or_else(|| {
                RiskError::invalid_input(
                    "occupation",
                    format!(
                        "'{}' is not one of: {}",
                        text.trim(),
                        Self::ALL
                            .iter()
                            .map(|o| o.display_name())
                            .collect::<Vec<_>>()
                            .join(", ")
                    ),
                )
            })
    }
}

impl fmt::Display for Occupation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl std::str::FromStr for Occupation {
    type Err = RiskError;

    fn from_str(s: &str) -> Result<Self> {
        Occupation::parse(s)
    }
}

/// Lowercase, trim, and join whitespace-separated words with `_`
pub fn normalize_token(text: &str) -> String {
    text.split_whitespace()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Trim and title-case a city name ("  new delhi" -> "New Delhi")
pub fn normalize_city(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(|c| c.to_lowercase()))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Attributes collected by the client form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawUserInput {
    pub age: u32,
    pub weight_kg: f64,
    pub height_m: f64,
    pub income_lpa: f64,
    pub smoker: bool,
    pub city: String,
    pub occupation: Occupation,
}

impl Default for RawUserInput {
    fn default() -> Self {
        Self {
            age: 30,
            weight_kg: 70.0,
            height_m: 1.75,
            income_lpa: 10.0,
            smoker: false,
            city: "Mumbai".to_string(),
            occupation: Occupation::PrivateJob,
        }
    }
}

impl RawUserInput {
    /// Check every field against the form bounds
    pub fn validate(&self) -> Result<()> {
        validate_age(self.age)?;
        validate_range("weight", self.weight_kg, &WEIGHT_RANGE)?;
        validate_range("height", self.height_m, &HEIGHT_RANGE)?;
        validate_range("income_lpa", self.income_lpa, &INCOME_RANGE)?;

        if normalize_city(&self.city).is_empty() {
            return Err(RiskError::invalid_input("city", "must not be empty"));
        }

        Ok(())
    }

    /// Body-mass index from weight and height
    pub fn bmi(&self) -> f64 {
        self.weight_kg / (self.height_m * self.height_m)
    }
}

pub fn validate_age(age: u32) -> Result<()> {
    if !AGE_RANGE.contains(&age) {
        return Err(RiskError::invalid_input(
            "age",
            format!(
                "{} is outside {}..={}",
                age,
                AGE_RANGE.start(),
                AGE_RANGE.end()
            ),
        ));
    }
    Ok(())
}

pub fn validate_range(field: &str, value: f64, range: &RangeInclusive<f64>) -> Result<()> {
    if !value.is_finite() || !range.contains(&value) {
        return Err(RiskError::invalid_input(
            field,
            format!("{} is outside {}..={}", value, range.start(), range.end()),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_bounds() {
        let mut input = RawUserInput::default();
        for age in [18, 100] {
            input.age = age;
            assert!(input.validate().is_ok(), "age {} should be accepted", age);
        }
        for age in [17, 101] {
            input.age = age;
            assert!(input.validate().is_err(), "age {} should be rejected", age);
        }
    }

    #[test]
    fn test_numeric_bounds() {
        let mut input = RawUserInput::default();
        input.weight_kg = 29.9;
        assert!(input.validate().is_err());

        let mut input = RawUserInput::default();
        input.height_m = 2.6;
        assert!(input.validate().is_err());

        let mut input = RawUserInput::default();
        input.income_lpa = f64::NAN;
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_blank_city_rejected() {
        let mut input = RawUserInput::default();
        input.city = "   ".to_string();
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_bmi() {
        let input = RawUserInput {
            weight_kg: 80.0,
            height_m: 2.0,
            ..RawUserInput::default()
        };
        assert!((input.bmi() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_occupation_tokens() {
        assert_eq!(Occupation::PrivateJob.token(), "private_job");
        assert_eq!(Occupation::BusinessOwner.token(), "business_owner");
        assert_eq!(Occupation::Student.token(), "student");
    }

    #[test]
    fn test_occupation_parse() {
        assert_eq!(Occupation::parse("Private Job").unwrap(), Occupation::PrivateJob);
        assert_eq!(
            Occupation::parse("  government   job ").unwrap(),
            Occupation::GovernmentJob
        );
        assert_eq!(Occupation::parse("retired").unwrap(), Occupation::Retired);
        assert!(Occupation::parse("astronaut").is_err());
    }

    #[test]
    fn test_normalize_city() {
        assert_eq!(normalize_city("  new   delhi "), "New Delhi");
        assert_eq!(normalize_city("MUMBAI"), "Mumbai");
        assert_eq!(normalize_city(""), "");
    }

    #[test]
    fn test_feature_lookup() {
        let record = FeatureRecord {
            bmi: 24.5,
            age_group: "26-35".to_string(),
            lifestyle_risk: "low".to_string(),
            city_tier: "1".to_string(),
            income_lpa: 12.0,
            occupation: "private_job".to_string(),
        };
        assert_eq!(record.value("bmi"), Some(FeatureValue::Numeric(24.5)));
        assert_eq!(
            record.value("city_tier"),
            Some(FeatureValue::Categorical("1"))
        );
        assert_eq!(record.value("height"), None);
        for name in FeatureRecord::FIELDS {
            assert!(record.value(name).is_some());
        }
    }

    #[test]
    fn test_record_rejects_unknown_fields() {
        let json = r#"{"bmi":24.5,"age_group":"26-35","lifestyle_risk":"low",
            "city_tier":"1","income_lpa":12.0,"occupation":"private_job","extra":1}"#;
        assert!(serde_json::from_str::<FeatureRecord>(json).is_err());
    }
}
