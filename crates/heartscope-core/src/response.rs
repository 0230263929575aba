#![forbid(unsafe_code)]

//! Prediction service replies.
//!
//! A reply is turned into a [`PredictionResponse`] only when it is complete:
//! a 2xx status, both `prediction_probability` and `shap_values` present, a
//! probability in `0..=100` and finite contributions. Everything else maps
//! to a [`PredictError`] so rendering never sees partial data.

use std::fmt;

use serde::Deserialize;
use serde::de::{Deserializer, MapAccess, Visitor};

use crate::error::{PredictError, PredictResult};

/// Per-feature signed contributions, in the order the service emitted them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapValues {
    entries: Vec<(String, f64)>,
}

impl ShapValues {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: f64) -> Self {
        self.entries.push((key.into(), value));
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| *v)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<'de> Deserialize<'de> for ShapValues {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = ShapValues;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object of feature name to number")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries: Vec<(String, f64)> =
                    Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, f64>()? {
                    match entries.iter_mut().find(|(k, _)| *k == key) {
                        Some(slot) => slot.1 = value,
                        None => entries.push((key, value)),
                    }
                }
                Ok(ShapValues { entries })
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}

/// A complete prediction: probability in percent plus its explanation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PredictionResponse {
    #[serde(rename = "prediction_probability")]
    pub probability: f64,
    pub shap_values: ShapValues,
}

impl PredictionResponse {
    #[must_use]
    pub fn new(probability: f64, shap_values: ShapValues) -> Self {
        Self {
            probability,
            shap_values,
        }
    }

    fn validate(self) -> PredictResult<Self> {
        if !self.probability.is_finite() || !(0.0..=100.0).contains(&self.probability) {
            return Err(PredictError::Malformed(format!(
                "prediction_probability {} is outside 0..=100",
                self.probability
            )));
        }
        if let Some((key, _)) = self.shap_values.iter().find(|(_, v)| !v.is_finite()) {
            return Err(PredictError::Malformed(format!(
                "shap value for '{key}' is not finite"
            )));
        }
        Ok(self)
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// Raw HTTP reply as handed over by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Interpret the reply.
    ///
    /// Non-2xx replies report the body's `error` field when the body is JSON
    /// carrying one, otherwise just the status.
    pub fn into_prediction(self) -> PredictResult<PredictionResponse> {
        if !self.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&self.body)
                .ok()
                .and_then(|b| b.error);
            return Err(PredictError::Server {
                status: self.status,
                message,
            });
        }
        serde_json::from_str::<PredictionResponse>(&self.body)
            .map_err(|e| PredictError::Malformed(e.to_string()))?
            .validate()
    }
}
