#![forbid(unsafe_code)]

//! Classifying a failed `fetch` as a timeout or a network error.

use heartscope_core::PredictError;

/// Error for a rejected fetch or body read.
///
/// An abort caused by our own deadline reports [`PredictError::Timeout`];
/// anything else is [`PredictError::Transport`] carrying `message`.
#[must_use]
pub fn fetch_failure(
    message: String,
    timeout_ms: Option<u64>,
    deadline_fired: bool,
) -> PredictError {
    match timeout_ms {
        Some(ms) if deadline_fired => PredictError::Timeout(ms),
        _ => PredictError::Transport(message),
    }
}
