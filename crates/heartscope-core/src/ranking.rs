#![forbid(unsafe_code)]

//! Ordering SHAP contributions by influence.

use serde::Deserialize;

use crate::features::FeatureNameMap;
use crate::response::ShapValues;

/// Whether a contribution pushes the risk up or down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Increases,
    Decreases,
}

impl Direction {
    /// Positive values increase risk; zero and negative values do not.
    #[must_use]
    pub fn of(value: f64) -> Self {
        if value > 0.0 {
            Self::Increases
        } else {
            Self::Decreases
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Increases => "Increases Risk",
            Self::Decreases => "Decreases Risk",
        }
    }
}

/// One feature's contribution after ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedFactor {
    pub key: String,
    pub value: f64,
}

impl RankedFactor {
    #[must_use]
    pub fn new(key: impl Into<String>, value: f64) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    #[must_use]
    pub fn magnitude(&self) -> f64 {
        self.value.abs()
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        Direction::of(self.value)
    }
}

/// A ranked factor resolved to its display label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledFactor {
    pub key: String,
    pub label: String,
    pub value: f64,
}

impl LabeledFactor {
    #[must_use]
    pub fn direction(&self) -> Direction {
        Direction::of(self.value)
    }
}

/// Attach friendly labels, keeping rank order.
#[must_use]
pub fn label_factors(ranked: &[RankedFactor], names: &FeatureNameMap) -> Vec<LabeledFactor> {
    ranked
        .iter()
        .map(|f| LabeledFactor {
            key: f.key.clone(),
            label: names.label(&f.key).to_string(),
            value: f.value,
        })
        .collect()
}

/// How many factors survive ranking.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RankingConfig {
    /// Keep at most this many factors. `None` keeps all.
    pub max_factors: Option<usize>,
    /// Drop factors whose magnitude is not strictly above this. `0.0`
    /// disables the filter.
    pub min_magnitude: f64,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            max_factors: None,
            min_magnitude: 0.0,
        }
    }
}

impl RankingConfig {
    /// Top five factors with magnitude above `0.01`.
    #[must_use]
    pub const fn compact() -> Self {
        Self {
            max_factors: Some(5),
            min_magnitude: 0.01,
        }
    }

    fn admits(&self, value: f64) -> bool {
        self.min_magnitude <= 0.0 || value.abs() > self.min_magnitude
    }
}

/// Stable sort by descending magnitude; ties keep the server's order.
#[must_use]
pub fn rank(shap: &ShapValues, config: &RankingConfig) -> Vec<RankedFactor> {
    let mut ranked: Vec<RankedFactor> = shap
        .iter()
        .filter(|(_, v)| config.admits(*v))
        .map(|(k, v)| RankedFactor::new(k, v))
        .collect();
    ranked.sort_by(|a, b| b.magnitude().total_cmp(&a.magnitude()));
    if let Some(max) = config.max_factors {
        ranked.truncate(max);
    }
    ranked
}
