#![forbid(unsafe_code)]

//! Error types for one prediction round-trip.
//!
//! [`PredictError`] covers everything that can end a submission early. Its
//! `Display` output is the text shown to the user in the result area, so the
//! wording is deliberately plain.

/// Why a submission did not produce a rendered result.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictError {
    /// A form field did not hold a finite number.
    #[error("field '{field}' must be a number (got '{value}')")]
    InvalidField { field: String, value: String },

    /// The request never produced an HTTP response.
    #[error("network error: {0}")]
    Transport(String),

    /// The request was aborted after the configured timeout.
    #[error("the prediction service did not respond within {0} ms")]
    Timeout(u64),

    /// The service answered with a non-2xx status.
    #[error("{}", server_message(*status, message.as_deref()))]
    Server { status: u16, message: Option<String> },

    /// A 2xx body that is not a well-formed prediction.
    #[error("malformed prediction response: {0}")]
    Malformed(String),

    /// A feature required by the configured contract is absent.
    #[error("prediction response is missing feature '{0}'")]
    MissingFeature(String),
}

fn server_message(status: u16, message: Option<&str>) -> String {
    match message {
        Some(msg) if !msg.trim().is_empty() => msg.to_string(),
        _ => format!("HTTP error! status: {status}"),
    }
}

impl PredictError {
    /// Stable short code, used as a structured log field.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidField { .. } => "invalid_field",
            Self::Transport(_) => "transport",
            Self::Timeout(_) => "timeout",
            Self::Server { .. } => "server",
            Self::Malformed(_) => "malformed",
            Self::MissingFeature(_) => "missing_feature",
        }
    }
}

/// Result alias for prediction operations.
pub type PredictResult<T> = Result<T, PredictError>;

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn server_error_prefers_message() {
        let err = PredictError::Server {
            status: 400,
            message: Some("Data input tidak lengkap.".into()),
        };
        assert_eq!(err.to_string(), "Data input tidak lengkap.");
    }

    #[test]
    fn server_error_falls_back_to_status() {
        let err = PredictError::Server {
            status: 503,
            message: None,
        };
        assert_eq!(err.to_string(), "HTTP error! status: 503");

        let blank = PredictError::Server {
            status: 500,
            message: Some("   ".into()),
        };
        assert_eq!(blank.to_string(), "HTTP error! status: 500");
    }

    #[test]
    fn codes_are_distinct() {
        let errs = [
            PredictError::InvalidField {
                field: "age".into(),
                value: "x".into(),
            },
            PredictError::Transport("down".into()),
            PredictError::Timeout(10),
            PredictError::Server {
                status: 500,
                message: None,
            },
            PredictError::Malformed("x".into()),
            PredictError::MissingFeature("chol".into()),
        ];
        let mut codes: Vec<_> = errs.iter().map(PredictError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errs.len());
    }
}
