//! Prediction output returned by the inference adapter and the HTTP API

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Label -> probability pairs kept in the model's class order.
///
/// Serializes as a JSON object; key order on the wire follows the model.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClassProbabilities(Vec<(String, f64)>);

impl ClassProbabilities {
    pub fn new(pairs: Vec<(String, f64)>) -> Self {
        Self(pairs)
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.0
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, p)| *p)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(l, p)| (l.as_str(), *p))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(l, _)| l.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().map(|(_, p)| p).sum()
    }

    /// Largest probability, or 0.0 when empty
    pub fn max(&self) -> f64 {
        self.0.iter().map(|(_, p)| *p).fold(0.0, f64::max)
    }
}

impl Serialize for ClassProbabilities {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, prob) in &self.0 {
            map.serialize_entry(label, prob)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ClassProbabilities {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = ClassProbabilities;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of class label to probability")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut pairs = Vec::with_capacity(access.size_hint().unwrap_or(3));
                while let Some((label, prob)) = access.next_entry::<String, f64>()? {
                    pairs.push((label, prob));
                }
                Ok(ClassProbabilities(pairs))
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}

/// Result of a single prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub predicted_category: String,
    pub confidence: f64,
    pub class_probabilities: ClassProbabilities,
}
