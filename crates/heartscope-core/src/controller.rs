#![forbid(unsafe_code)]

//! Form Controller: one submission from form fields to a rendered result.
//!
//! The controller is host-driven. The host supplies a
//! [`PredictionTransport`] (an HTTP client) and a [`View`] (the page), and
//! calls [`FormController::submit`] from its submit handler.
//!
//! # Invariants
//!
//! 1. At most one submission is in flight; a second call while busy returns
//!    [`SubmitOutcome::Ignored`] without touching the view.
//! 2. Busy state is cleared on every exit path (a drop guard owns it).
//! 3. The previous chart is destroyed before the result area is replaced,
//!    so a failed submission leaves no chart alive.
//! 4. Nothing reaches [`View::show_result`] unless the reply parsed into a
//!    complete, valid prediction and passed the feature contract.

use core::future::Future;
use core::time::Duration;
use std::cell::Cell;

use crate::chart::ChartError;
use crate::config::AppConfig;
use crate::error::{PredictError, PredictResult};
use crate::features::FeatureContract;
use crate::input::FormInput;
use crate::ranking::LabeledFactor;
use crate::render::{RenderSettings, ResultView, render_result};
use crate::response::HttpReply;

/// One outgoing prediction request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictRequest<'a> {
    pub endpoint: &'a str,
    pub body: String,
    pub timeout: Option<Duration>,
}

/// HTTP client used for the prediction call.
///
/// Implementations report a failed or timed-out request as
/// [`PredictError::Transport`] / [`PredictError::Timeout`] and return any
/// HTTP reply, whatever its status, as `Ok`.
pub trait PredictionTransport {
    fn post_json(
        &self,
        request: PredictRequest<'_>,
    ) -> impl Future<Output = PredictResult<HttpReply>>;
}

/// The page as seen by the controller.
pub trait View {
    /// Disable/enable the submit control and toggle its spinner.
    fn set_busy(&self, busy: bool);
    /// Replace the result area with the busy placeholder.
    fn show_loading(&self);
    /// Hide and empty the recommendation card.
    fn clear_recommendation(&self);
    /// Destroy the chart in the result area before its canvas is replaced.
    fn clear_chart(&self);
    /// Show the result card and recommendation card.
    fn show_result(&self, view: &ResultView);
    /// Draw (or redraw) the contribution chart.
    fn render_chart(&self, factors: &[LabeledFactor]) -> Result<(), ChartError>;
    /// Replace the result area with an error message.
    fn show_error(&self, message: &str);
}

/// What a call to [`FormController::submit`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Rendered(ResultView),
    Failed(PredictError),
    /// Another submission was already in flight.
    Ignored,
}

/// Clears the in-flight flag and the view's busy state when dropped.
struct BusyGuard<'a, V: View> {
    view: &'a V,
    in_flight: &'a Cell<bool>,
}

impl<'a, V: View> BusyGuard<'a, V> {
    fn engage(view: &'a V, in_flight: &'a Cell<bool>) -> Self {
        view.set_busy(true);
        view.clear_recommendation();
        view.clear_chart();
        view.show_loading();
        Self { view, in_flight }
    }
}

impl<V: View> Drop for BusyGuard<'_, V> {
    fn drop(&mut self) {
        self.in_flight.set(false);
        self.view.set_busy(false);
    }
}

/// Drives submissions against one endpoint.
#[derive(Debug)]
pub struct FormController<T> {
    transport: T,
    endpoint: String,
    timeout: Option<Duration>,
    contract: FeatureContract,
    settings: RenderSettings,
    in_flight: Cell<bool>,
}

impl<T: PredictionTransport> FormController<T> {
    #[must_use]
    pub fn new(transport: T, config: &AppConfig) -> Self {
        Self {
            transport,
            endpoint: config.endpoint.clone(),
            timeout: config.request_timeout(),
            contract: config.contract(),
            settings: config.render_settings(),
            in_flight: Cell::new(false),
        }
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.in_flight.get()
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Handle one form submission.
    ///
    /// `fields` are the raw `(name, value)` pairs read from the form.
    pub async fn submit<V, I, K, S>(&self, fields: I, view: &V) -> SubmitOutcome
    where
        V: View,
        I: IntoIterator<Item = (K, S)>,
        K: AsRef<str>,
        S: AsRef<str>,
    {
        if self.in_flight.replace(true) {
            tracing::debug!("submission ignored, request already in flight");
            return SubmitOutcome::Ignored;
        }
        let _busy = BusyGuard::engage(view, &self.in_flight);

        match self.predict(fields).await {
            Ok(result) => {
                view.show_result(&result);
                if let Err(err) = view.render_chart(&result.factors) {
                    tracing::warn!(error = %err, "chart not rendered");
                }
                tracing::info!(
                    probability = result.probability,
                    tier = result.tier.label(),
                    factors = result.factors.len(),
                    "prediction rendered"
                );
                SubmitOutcome::Rendered(result)
            }
            Err(err) => {
                tracing::error!(code = err.code(), error = %err, "prediction failed");
                view.show_error(&err.to_string());
                SubmitOutcome::Failed(err)
            }
        }
    }

    async fn predict<I, K, S>(&self, fields: I) -> PredictResult<ResultView>
    where
        I: IntoIterator<Item = (K, S)>,
        K: AsRef<str>,
        S: AsRef<str>,
    {
        let input = FormInput::from_fields(fields)?;
        let request = PredictRequest {
            endpoint: &self.endpoint,
            body: input.to_json()?,
            timeout: self.timeout,
        };
        tracing::debug!(endpoint = %self.endpoint, fields = input.len(), "posting prediction request");
        let reply = self.transport.post_json(request).await?;
        let response = reply.into_prediction()?;
        self.contract
            .validate(&response.shap_values, &self.settings.names)?;
        Ok(render_result(&response, &input, &self.settings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    struct FixedTransport(PredictResult<HttpReply>);

    impl PredictionTransport for FixedTransport {
        async fn post_json(&self, _request: PredictRequest<'_>) -> PredictResult<HttpReply> {
            self.0.clone()
        }
    }

    #[derive(Default)]
    struct LogView {
        events: RefCell<Vec<String>>,
    }

    impl View for LogView {
        fn set_busy(&self, busy: bool) {
            self.events.borrow_mut().push(format!("busy={busy}"));
        }
        fn show_loading(&self) {
            self.events.borrow_mut().push("loading".into());
        }
        fn clear_recommendation(&self) {
            self.events.borrow_mut().push("clear".into());
        }
        fn clear_chart(&self) {
            self.events.borrow_mut().push("clear chart".into());
        }
        fn show_result(&self, view: &ResultView) {
            self.events
                .borrow_mut()
                .push(format!("result {}", view.probability_text()));
        }
        fn render_chart(&self, factors: &[LabeledFactor]) -> Result<(), ChartError> {
            self.events
                .borrow_mut()
                .push(format!("chart {}", factors.len()));
            Ok(())
        }
        fn show_error(&self, message: &str) {
            self.events.borrow_mut().push(format!("error {message}"));
        }
    }

    fn ok_reply() -> PredictResult<HttpReply> {
        Ok(HttpReply::new(
            200,
            r#"{"prediction_probability": 12, "shap_values": {"thalch": -0.4}}"#,
        ))
    }

    #[test]
    fn success_sequence() {
        let ctl = FormController::new(FixedTransport(ok_reply()), &AppConfig::default());
        let view = LogView::default();
        let outcome = pollster::block_on(ctl.submit([("thalch", "170")], &view));

        assert!(matches!(outcome, SubmitOutcome::Rendered(_)));
        assert_eq!(
            *view.events.borrow(),
            vec![
                "busy=true",
                "clear",
                "clear chart",
                "loading",
                "result 12%",
                "chart 1",
                "busy=false"
            ]
        );
        assert!(!ctl.is_busy());
    }

    #[test]
    fn invalid_field_never_reaches_transport() {
        let ctl = FormController::new(
            FixedTransport(Err(PredictError::Transport("should not be called".into()))),
            &AppConfig::default(),
        );
        let view = LogView::default();
        let outcome = pollster::block_on(ctl.submit([("age", "abc")], &view));

        assert!(matches!(
            outcome,
            SubmitOutcome::Failed(PredictError::InvalidField { .. })
        ));
        assert_eq!(
            view.events.borrow().last().map(String::as_str),
            Some("busy=false")
        );
    }

    #[test]
    fn second_submit_while_busy_is_ignored() {
        let ctl = FormController::new(FixedTransport(ok_reply()), &AppConfig::default());
        ctl.in_flight.set(true);
        let view = LogView::default();
        let outcome = pollster::block_on(ctl.submit([("age", "50")], &view));

        assert_eq!(outcome, SubmitOutcome::Ignored);
        assert!(view.events.borrow().is_empty());
        assert!(ctl.is_busy());
    }

    #[test]
    fn contract_violation_is_an_error() {
        let cfg = AppConfig {
            required_features: vec!["chol".into()],
            ..AppConfig::default()
        };
        let ctl = FormController::new(FixedTransport(ok_reply()), &cfg);
        let view = LogView::default();
        let outcome = pollster::block_on(ctl.submit([("thalch", "170")], &view));

        assert_eq!(
            outcome,
            SubmitOutcome::Failed(PredictError::MissingFeature("chol".into()))
        );
        assert!(
            view.events
                .borrow()
                .contains(&"error prediction response is missing feature 'chol'".to_string())
        );
    }
}
