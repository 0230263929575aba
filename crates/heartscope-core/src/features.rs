#![forbid(unsafe_code)]

//! Feature keys: friendly labels and the expected-key contract.

use crate::error::{PredictError, PredictResult};
use crate::response::ShapValues;

const LABELS: &[(&str, &str)] = &[
    ("age", "Age"),
    ("sex", "Sex"),
    ("trestbps", "Blood Pressure"),
    ("chol", "Cholesterol"),
    ("thalch", "Max. Heart Rate (during test)"),
    ("oldpeak", "ECG Result (Stress Test)"),
    ("cp_0", "Chest Pain Type (Typical Angina)"),
    ("cp_1", "Chest Pain Type (Atypical Angina)"),
    ("cp_2", "Chest Pain Type (Non-Anginal)"),
    ("cp_3", "No Chest Pain Symptoms"),
    ("fbs_0", "Fasting Blood Sugar (< 120 mg/dl)"),
    ("fbs_1", "Fasting Blood Sugar (> 120 mg/dl)"),
    ("restecg_0", "Resting ECG (Normal)"),
    ("restecg_1", "Resting ECG (Abnormal)"),
    ("restecg_2", "Resting ECG (Hypertrophy)"),
    ("exang_0", "Chest Pain During Exercise (No)"),
    ("exang_1", "Chest Pain During Exercise (Yes)"),
    ("slope_0", "Exercise ECG Slope (Upsloping)"),
    ("slope_1", "Exercise ECG Slope (Flat)"),
    ("slope_2", "Exercise ECG Slope (Downsloping)"),
    ("ca_0", "Artery Blockage (0 Detected)"),
    ("ca_1", "Artery Blockage (1 Detected)"),
    ("ca_2", "Artery Blockage (2 Detected)"),
    ("ca_3", "Artery Blockage (3 Detected)"),
    ("ca_4", "Artery Blockage (4 Detected)"),
    ("thal_0", "Heart Scan (No Data)"),
    ("thal_1", "Heart Scan (Normal Flow)"),
    ("thal_2", "Heart Scan (Fixed Defect)"),
    ("thal_3", "Heart Scan (Reversible Defect)"),
];

/// Static lookup from feature key to a human-readable label.
#[derive(Debug, Clone, Copy)]
pub struct FeatureNameMap {
    table: &'static [(&'static str, &'static str)],
}

impl Default for FeatureNameMap {
    fn default() -> Self {
        Self::clinical()
    }
}

impl FeatureNameMap {
    /// Labels for the heart-disease feature set, including one-hot columns.
    #[must_use]
    pub const fn clinical() -> Self {
        Self { table: LABELS }
    }

    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<&'static str> {
        self.table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }

    /// Friendly label, or the raw key when unmapped.
    #[must_use]
    pub fn label<'a>(&self, key: &'a str) -> &'a str {
        self.lookup(key).unwrap_or(key)
    }

    #[must_use]
    pub fn is_known(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }
}

/// Keys a response must carry to be rendered.
///
/// An empty contract accepts any key set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureContract {
    required: Vec<String>,
}

impl FeatureContract {
    #[must_use]
    pub fn new<I, S>(required: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            required: required.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn required(&self) -> &[String] {
        &self.required
    }

    /// Fail on the first required key the response lacks, and warn about
    /// keys that have no friendly label.
    pub fn validate(&self, shap: &ShapValues, names: &FeatureNameMap) -> PredictResult<()> {
        if let Some(missing) = self.required.iter().find(|k| !shap.contains(k)) {
            return Err(PredictError::MissingFeature(missing.clone()));
        }
        for (key, _) in shap.iter() {
            if !names.is_known(key) {
                tracing::warn!(feature = key, "no friendly label for feature, showing raw key");
            }
        }
        Ok(())
    }
}
