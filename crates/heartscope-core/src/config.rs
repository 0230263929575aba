#![forbid(unsafe_code)]

//! Application configuration.
//!
//! The host passes an optional JSON object; every field has a default, so
//! `{}` (or no config at all) yields [`AppConfig::default`].

use core::time::Duration;

use serde::Deserialize;
use tracing_subscriber::filter::LevelFilter;

use crate::features::{FeatureContract, FeatureNameMap};
use crate::ranking::RankingConfig;
use crate::recommend::DuplicatePolicy;
use crate::render::RenderSettings;
use crate::theme::DEFAULT_THEME_KEY;

/// Endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "/api/predict_heart_disease";

/// Problems with a supplied configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Parse(String),
    #[error("invalid config value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Top-level configuration for the web client.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub endpoint: String,
    pub theme_storage_key: String,
    pub ranking: RankingConfig,
    pub duplicate_policy: DuplicatePolicy,
    pub required_features: Vec<String>,
    pub request_timeout_ms: Option<u64>,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            theme_storage_key: DEFAULT_THEME_KEY.to_string(),
            ranking: RankingConfig::default(),
            duplicate_policy: DuplicatePolicy::default(),
            required_features: Vec::new(),
            request_timeout_ms: None,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Parse and validate a JSON config. Blank input means defaults.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: Self =
            serde_json::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.trim().is_empty() {
            return Err(invalid("endpoint", "must not be empty"));
        }
        if self.theme_storage_key.trim().is_empty() {
            return Err(invalid("theme_storage_key", "must not be empty"));
        }
        if self.ranking.max_factors == Some(0) {
            return Err(invalid("ranking.max_factors", "must be at least 1"));
        }
        let min = self.ranking.min_magnitude;
        if !min.is_finite() || min < 0.0 {
            return Err(invalid(
                "ranking.min_magnitude",
                format!("must be a finite number >= 0, got {min}"),
            ));
        }
        if self.request_timeout_ms == Some(0) {
            return Err(invalid("request_timeout_ms", "must be at least 1"));
        }
        self.level_filter()?;
        Ok(())
    }

    /// Parsed `log_level`.
    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        match self.log_level.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(LevelFilter::TRACE),
            "debug" => Ok(LevelFilter::DEBUG),
            "info" => Ok(LevelFilter::INFO),
            "warn" => Ok(LevelFilter::WARN),
            "error" => Ok(LevelFilter::ERROR),
            "off" => Ok(LevelFilter::OFF),
            other => Err(invalid(
                "log_level",
                format!("expected trace/debug/info/warn/error/off, got '{other}'"),
            )),
        }
    }

    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    #[must_use]
    pub fn contract(&self) -> FeatureContract {
        FeatureContract::new(self.required_features.iter().cloned())
    }

    #[must_use]
    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            ranking: self.ranking,
            duplicate_policy: self.duplicate_policy,
            names: FeatureNameMap::clinical(),
        }
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn blank_and_empty_object_are_defaults() {
        assert_eq!(AppConfig::from_json("").unwrap(), AppConfig::default());
        assert_eq!(AppConfig::from_json("{}").unwrap(), AppConfig::default());
    }

    #[test]
    fn parses_every_field() {
        let cfg = AppConfig::from_json(
            r#"{
                "endpoint": "/v2/predict",
                "theme_storage_key": "hs-theme",
                "ranking": {"max_factors": 5, "min_magnitude": 0.01},
                "duplicate_policy": "confirm",
                "required_features": ["age", "chol"],
                "request_timeout_ms": 15000,
                "log_level": "debug"
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.endpoint, "/v2/predict");
        assert_eq!(cfg.ranking, RankingConfig::compact());
        assert_eq!(cfg.duplicate_policy, DuplicatePolicy::Confirm);
        assert_eq!(cfg.contract().required(), ["age", "chol"]);
        assert_eq!(cfg.request_timeout(), Some(Duration::from_secs(15)));
        assert_eq!(cfg.level_filter().unwrap(), LevelFilter::DEBUG);
    }

    #[test]
    fn rejects_unknown_fields() {
        assert!(matches!(
            AppConfig::from_json(r#"{"endpiont": "/x"}"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn rejects_bad_values() {
        let cases = [
            (r#"{"endpoint": " "}"#, "endpoint"),
            (r#"{"theme_storage_key": ""}"#, "theme_storage_key"),
            (r#"{"ranking": {"max_factors": 0}}"#, "ranking.max_factors"),
            (r#"{"ranking": {"min_magnitude": -1}}"#, "ranking.min_magnitude"),
            (r#"{"request_timeout_ms": 0}"#, "request_timeout_ms"),
            (r#"{"log_level": "loud"}"#, "log_level"),
        ];
        for (raw, field) in cases {
            match AppConfig::from_json(raw) {
                Err(ConfigError::Invalid { field: f, .. }) => assert_eq!(f, field, "{raw}"),
                other => panic!("{raw}: expected invalid {field}, got {other:?}"),
            }
        }
    }
}
