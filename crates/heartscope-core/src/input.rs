#![forbid(unsafe_code)]

//! Numeric form record posted to the prediction service.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::{PredictError, PredictResult};

/// Field names the recommendation rules read.
pub mod fields {
    pub const AGE: &str = "age";
    pub const SEX: &str = "sex";
    pub const RESTING_BP: &str = "trestbps";
    pub const CHOLESTEROL: &str = "chol";
    pub const MAX_HEART_RATE: &str = "thalch";
}

/// One submission's worth of clinical inputs, keyed by form field name.
///
/// Entries keep document order. Serializes as a flat JSON object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormInput {
    entries: Vec<(String, f64)>,
}

impl FormInput {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse raw `(name, value)` pairs as read from the form.
    ///
    /// Every value must parse as a finite `f64` after trimming. A repeated
    /// name keeps its first position and its last value.
    pub fn from_fields<I, K, V>(pairs: I) -> PredictResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut input = Self::new();
        for (name, raw) in pairs {
            let name = name.as_ref();
            let raw = raw.as_ref();
            let value = raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| PredictError::InvalidField {
                    field: name.to_string(),
                    value: raw.to_string(),
                })?;
            input.insert(name, value);
        }
        Ok(input)
    }

    /// Set a field, replacing any previous value in place.
    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        let name = name.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Builder form of [`FormInput::insert`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.insert(name, value);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| *v)
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

    /// JSON request body.
    pub fn to_json(&self) -> PredictResult<String> {
        serde_json::to_string(self).map_err(|e| PredictError::Malformed(e.to_string()))
    }
}

impl Serialize for FormInput {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn parses_numbers_in_document_order() {
        let input =
            FormInput::from_fields([("age", "55"), ("sex", "1"), ("chol", " 250.5 ")]).unwrap();
        assert_eq!(input.get("chol"), Some(250.5));
        assert_eq!(
            input.to_json().unwrap(),
            r#"{"age":55.0,"sex":1.0,"chol":250.5}"#
        );
    }

    #[test]
    fn rejects_non_numeric_field() {
        let err = FormInput::from_fields([("age", "55"), ("chol", "high")]).unwrap_err();
        assert_eq!(
            err,
            PredictError::InvalidField {
                field: "chol".into(),
                value: "high".into(),
            }
        );
    }

    #[test]
    fn rejects_empty_and_non_finite() {
        assert!(FormInput::from_fields([("age", "")]).is_err());
        assert!(FormInput::from_fields([("age", "NaN")]).is_err());
        assert!(FormInput::from_fields([("age", "inf")]).is_err());
    }

    #[test]
    fn repeated_field_keeps_last_value() {
        let input = FormInput::from_fields([("age", "40"), ("sex", "0"), ("age", "41")]).unwrap();
        assert_eq!(input.len(), 2);
        assert_eq!(input.get("age"), Some(41.0));
        let names: Vec<_> = input.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["age", "sex"]);
    }
}
