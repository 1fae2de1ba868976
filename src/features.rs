//! Raw input -> feature record derivation
//!
//! The bucketing thresholds are business rules, so they live in the
//! `[rules]` section of the config file. The defaults below match the
//! vocabulary of the bundled demo artifact.

use crate::errors::{RiskError, Result};
use crate::types::features::normalize_city;
use crate::types::{FeatureRecord, RawUserInput};
use serde::{Deserialize, Serialize};

/// Upper-inclusive age band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeBand {
    pub max_age: u32,
    pub label: String,
}

/// BMI thresholds combined with smoking status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifestyleRules {
    /// Smokers above this BMI are "high"
    pub high_bmi: f64,
    /// Smokers, or anyone above this BMI, are "medium"
    pub medium_bmi: f64,
}

/// City name lists per tier; everything else is tier 3
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CityTiers {
    pub tier_1: Vec<String>,
    pub tier_2: Vec<String>,
}

/// Complete rule table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureRules {
    /// Label for ages above the last band
    pub senior_label: String,
    /// Ascending by `max_age`
    pub age_groups: Vec<AgeBand>,
    pub lifestyle: LifestyleRules,
    pub city_tiers: CityTiers,
}

impl Default for FeatureRules {
    fn default() -> Self {
        let band = |max_age, label: &str| AgeBand {
            max_age,
            label: label.to_string(),
        };
        Self {
            senior_label: "60+".to_string(),
            age_groups: vec![
                band(25, "18-25"),
                band(35, "26-35"),
                band(45, "36-45"),
                band(60, "46-60"),
            ],
            lifestyle: LifestyleRules::default(),
            city_tiers: CityTiers::default(),
        }
    }
}

impl Default for LifestyleRules {
    fn default() -> Self {
        Self {
            high_bmi: 30.0,
            medium_bmi: 27.0,
        }
    }
}

impl Default for CityTiers {
    fn default() -> Self {
        let list =
            |names: &[&str]| -> Vec<String> { names.iter().map(|s| s.to_string()).collect() };
        Self {
            tier_1: list(&[
                "Mumbai",
                "Delhi",
                "Bangalore",
                "Chennai",
                "Kolkata",
                "Hyderabad",
                "Pune",
            ]),
            tier_2: list(&[
                "Jaipur",
                "Chandigarh",
                "Indore",
                "Lucknow",
                "Patna",
                "Ranchi",
                "Visakhapatnam",
                "Coimbatore",
                "Bhopal",
                "Nagpur",
                "Vadodara",
                "Surat",
                "Rajkot",
                "Jodhpur",
                "Raipur",
                "Amritsar",
                "Varanasi",
                "Agra",
                "Dehradun",
                "Mysore",
                "Jabalpur",
                "Guwahati",
                "Thiruvananthapuram",
                "Ludhiana",
                "Nashik",
                "Allahabad",
                "Udaipur",
                "Aurangabad",
                "Hubli",
                "Belgaum",
                "Salem",
                "Vijayawada",
                "Tiruchirappalli",
                "Bhavnagar",
                "Gwalior",
                "Dhanbad",
                "Bareilly",
                "Aligarh",
                "Gaya",
                "Kozhikode",
                "Warangal",
                "Kolhapur",
                "Bilaspur",
                "Jalandhar",
                "Noida",
                "Guntur",
                "Asansol",
                "Siliguri",
            ]),
        }
    }
}

impl FeatureRules {
    /// Check the table is usable
    pub fn validate(&self) -> Result<()> {
        if self.age_groups.is_empty() {
            return Err(RiskError::ConfigError(
                "rules.age_groups must not be empty".to_string(),
            ));
        }
        if self
            .age_groups
            .windows(2)
            .any(|w| w[0].max_age >= w[1].max_age)
        {
            return Err(RiskError::ConfigError(
                "rules.age_groups must be strictly ascending by max_age".to_string(),
            ));
        }
        if self.age_groups.iter().any(|b| b.label.trim().is_empty())
            || self.senior_label.trim().is_empty()
        {
            return Err(RiskError::ConfigError(
                "rules age group labels must not be empty".to_string(),
            ));
        }
        let LifestyleRules {
            high_bmi,
            medium_bmi,
        } = self.lifestyle;
        if !(medium_bmi.is_finite() && high_bmi.is_finite()) || medium_bmi > high_bmi {
            return Err(RiskError::ConfigError(
                "rules.lifestyle requires finite medium_bmi <= high_bmi".to_string(),
            ));
        }
        Ok(())
    }

    pub fn age_group(&self, age: u32) -> &str {
        self.age_groups
            .iter()
            .find(|b| age <= b.max_age)
            .map(|b| b.label.as_str())
            .unwrap_or(self.senior_label.as_str())
    }

    pub fn lifestyle_risk(&self, smoker: bool, bmi: f64) -> &'static str {
        if smoker && bmi > self.lifestyle.high_bmi {
            "high"
        } else if smoker || bmi > self.lifestyle.medium_bmi {
            "medium"
        } else {
            "low"
        }
    }

    pub fn city_tier(&self, city: &str) -> &'static str {
        let city = normalize_city(city);
        let listed = |names: &[String]| names.iter().any(|n| n.eq_ignore_ascii_case(&city));
        if listed(&self.city_tiers.tier_1) {
            "1"
        } else if listed(&self.city_tiers.tier_2) {
            "2"
        } else {
            "3"
        }
    }

    /// Build the model record from validated raw input
    pub fn derive(&self, input: &RawUserInput) -> Result<FeatureRecord> {
        input.validate()?;
        let bmi = input.bmi();

        Ok(FeatureRecord {
            bmi,
            age_group: self.age_group(input.age).to_string(),
            lifestyle_risk: self.lifestyle_risk(input.smoker, bmi).to_string(),
            city_tier: self.city_tier(&input.city).to_string(),
            income_lpa: input.income_lpa,
            occupation: input.occupation.token(),
        })
    }
}
