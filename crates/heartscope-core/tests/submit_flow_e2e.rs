//! End-to-end submission flow with a scripted transport and a recording page.
//!
//! Covers the full path: form fields → request body → reply parsing → risk
//! tier, ranking and narrative → chart slot lifecycle → busy state.

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::{Pin, pin};
use std::task::{Context, Poll, Waker};

use heartscope_core::chart::{ChartAdapter, ChartConfig, ChartError, ChartHost, ChartOptions, NoStyles};
use heartscope_core::controller::{PredictRequest, PredictionTransport, View};
use heartscope_core::ranking::LabeledFactor;
use heartscope_core::render::{ResultView, error_html, loading_html};
use heartscope_core::{
    AppConfig, FormController, HttpReply, PredictError, PredictResult, RiskTier, SubmitOutcome,
    Theme,
};
use pretty_assertions::assert_eq;

// ============================================================================
// Fakes
// ============================================================================

/// Pending on first poll, ready on the second.
#[derive(Default)]
struct YieldOnce(bool);

impl Future for YieldOnce {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0 {
            Poll::Ready(())
        } else {
            self.0 = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

struct ScriptedTransport {
    reply: PredictResult<HttpReply>,
    bodies: RefCell<Vec<(String, String)>>,
}

impl ScriptedTransport {
    fn replying(status: u16, body: &str) -> Self {
        Self {
            reply: Ok(HttpReply::new(status, body)),
            bodies: RefCell::default(),
        }
    }

    fn failing(err: PredictError) -> Self {
        Self {
            reply: Err(err),
            bodies: RefCell::default(),
        }
    }
}

impl PredictionTransport for ScriptedTransport {
    async fn post_json(&self, request: PredictRequest<'_>) -> PredictResult<HttpReply> {
        self.bodies
            .borrow_mut()
            .push((request.endpoint.to_string(), request.body));
        YieldOnce::default().await;
        self.reply.clone()
    }
}

#[derive(Default)]
struct RecordingHost {
    next_id: u32,
    alive: Vec<u32>,
    created: Vec<ChartConfig>,
}

impl ChartHost for RecordingHost {
    type Handle = u32;

    fn create(&mut self, config: &ChartConfig) -> Result<u32, ChartError> {
        self.next_id += 1;
        self.alive.push(self.next_id);
        self.created.push(config.clone());
        Ok(self.next_id)
    }

    fn destroy(&mut self, handle: u32) {
        self.alive.retain(|h| *h != handle);
    }

    fn update_options(&mut self, _handle: &u32, _options: &ChartOptions) -> Result<(), ChartError> {
        Ok(())
    }
}

struct Page {
    busy: Cell<bool>,
    busy_changes: Cell<u32>,
    result_area: RefCell<String>,
    recommendation: RefCell<Option<String>>,
    chart: RefCell<ChartAdapter<RecordingHost>>,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            busy: Cell::new(false),
            busy_changes: Cell::new(0),
            result_area: RefCell::default(),
            recommendation: RefCell::default(),
            chart: RefCell::new(ChartAdapter::new(RecordingHost::default())),
        }
    }
}

impl View for Page {
    fn set_busy(&self, busy: bool) {
        self.busy.set(busy);
        self.busy_changes.set(self.busy_changes.get() + 1);
    }

    fn show_loading(&self) {
        *self.result_area.borrow_mut() = loading_html();
    }

    fn clear_recommendation(&self) {
        *self.recommendation.borrow_mut() = None;
    }

    fn clear_chart(&self) {
        self.chart.borrow_mut().clear();
    }

    fn show_result(&self, view: &ResultView) {
        *self.result_area.borrow_mut() = view.result_card_html();
        *self.recommendation.borrow_mut() = Some(view.recommendation_html());
    }

    fn render_chart(&self, factors: &[LabeledFactor]) -> Result<(), ChartError> {
        self.chart
            .borrow_mut()
            .render(factors, Theme::Light, &NoStyles)
    }

    fn show_error(&self, message: &str) {
        *self.result_area.borrow_mut() = error_html(message);
    }
}

fn form() -> Vec<(&'static str, &'static str)> {
    vec![
        ("age", "55"),
        ("sex", "1"),
        ("trestbps", "150"),
        ("chol", "250"),
        ("thalch", "140"),
    ]
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn high_risk_submission_renders_warnings() {
    let transport = ScriptedTransport::replying(
        200,
        r#"{"prediction_probability": 82, "shap_values": {"chol": 0.3, "trestbps": 0.2}}"#,
    );
    let ctl = FormController::new(transport, &AppConfig::default());
    let page = Page::default();

    let outcome = pollster::block_on(ctl.submit(form(), &page));
    let SubmitOutcome::Rendered(view) = outcome else {
        panic!("expected a rendered result, got {outcome:?}");
    };

    assert_eq!(view.tier, RiskTier::High);
    assert_eq!(view.probability_text(), "82%");
    assert!(page.result_area.borrow().contains("text-red-500"));

    let rec = page.recommendation.borrow().clone().unwrap_or_default();
    assert!(rec.contains("Your cholesterol is very high"));
    assert!(rec.contains("Your blood pressure is high"));
    assert!(rec.contains("Being 50 or older"));
    assert!(!rec.contains("unique factor"));
    assert!(rec.contains("Always consult your doctor."));

    let sent = ctl.transport().bodies.borrow();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "/api/predict_heart_disease");
    assert_eq!(
        sent[0].1,
        r#"{"age":55.0,"sex":1.0,"trestbps":150.0,"chol":250.0,"thalch":140.0}"#
    );

    let chart = page.chart.borrow();
    assert_eq!(chart.host().alive.len(), 1);
    assert_eq!(
        chart.host().created[0].data.labels,
        vec!["Cholesterol".to_string(), "Blood Pressure".to_string()]
    );
    assert!(!page.busy.get());
}

#[test]
fn low_risk_submission_names_protective_factor() {
    let transport = ScriptedTransport::replying(
        200,
        r#"{"prediction_probability": 10, "shap_values": {"thalch": -0.4, "age": 0.1}}"#,
    );
    let ctl = FormController::new(transport, &AppConfig::default());
    let page = Page::default();

    let fields = [("age", "40"), ("thalch", "175")];
    let outcome = pollster::block_on(ctl.submit(fields, &page));
    let SubmitOutcome::Rendered(view) = outcome else {
        panic!("expected a rendered result, got {outcome:?}");
    };

    assert_eq!(view.tier, RiskTier::Low);
    let top = view
        .recommendation
        .top_factor_note()
        .map(|n| n.sentence.to_plain_text());
    assert_eq!(
        top.as_deref(),
        Some(
            "Good news! AI analysis shows Max. Heart Rate (during test) is the main factor lowering your risk. Keep it up!"
        )
    );
    assert!(page.result_area.borrow().contains("text-green-500"));
}

#[test]
fn missing_shap_values_is_an_error_and_clears_busy() {
    let transport = ScriptedTransport::replying(200, r#"{"prediction_probability": 55}"#);
    let ctl = FormController::new(transport, &AppConfig::default());
    let page = Page::default();

    let outcome = pollster::block_on(ctl.submit(form(), &page));

    assert!(matches!(
        outcome,
        SubmitOutcome::Failed(PredictError::Malformed(_))
    ));
    assert!(page.result_area.borrow().contains("Something went wrong"));
    assert!(page.recommendation.borrow().is_none());
    assert!(!page.chart.borrow().is_live());
    assert!(!page.busy.get());
    assert!(!ctl.is_busy());
}

#[test]
fn server_error_message_is_shown() {
    let transport =
        ScriptedTransport::replying(500, r#"{"error": "Model not loaded, try again later"}"#);
    let ctl = FormController::new(transport, &AppConfig::default());
    let page = Page::default();

    let outcome = pollster::block_on(ctl.submit(form(), &page));

    assert_eq!(
        outcome,
        SubmitOutcome::Failed(PredictError::Server {
            status: 500,
            message: Some("Model not loaded, try again later".into()),
        })
    );
    assert!(
        page.result_area
            .borrow()
            .contains("Model not loaded, try again later")
    );
}

#[test]
fn transport_failure_clears_busy() {
    let ctl = FormController::new(
        ScriptedTransport::failing(PredictError::Transport("connection refused".into())),
        &AppConfig::default(),
    );
    let page = Page::default();

    let outcome = pollster::block_on(ctl.submit(form(), &page));

    assert_eq!(
        outcome,
        SubmitOutcome::Failed(PredictError::Transport("connection refused".into()))
    );
    assert!(
        page.result_area
            .borrow()
            .contains("network error: connection refused")
    );
    assert!(!page.busy.get());
    assert_eq!(page.busy_changes.get(), 2);
}

#[test]
fn second_submission_while_in_flight_is_ignored() {
    let transport = ScriptedTransport::replying(
        200,
        r#"{"prediction_probability": 45, "shap_values": {"chol": 0.1}}"#,
    );
    let ctl = FormController::new(transport, &AppConfig::default());
    let page = Page::default();

    let mut first = pin!(ctl.submit(form(), &page));
    let mut cx = Context::from_waker(Waker::noop());
    assert!(first.as_mut().poll(&mut cx).is_pending());
    assert!(ctl.is_busy());
    assert!(page.busy.get());

    let second = pollster::block_on(ctl.submit(form(), &page));
    assert_eq!(second, SubmitOutcome::Ignored);
    assert!(page.busy.get());

    let first = pollster::block_on(first);
    assert!(matches!(first, SubmitOutcome::Rendered(_)));
    assert_eq!(ctl.transport().bodies.borrow().len(), 1);
    assert!(!page.busy.get());
}

#[test]
fn resubmitting_replaces_the_chart() {
    let transport = ScriptedTransport::replying(
        200,
        r#"{"prediction_probability": 45, "shap_values": {"chol": 0.1, "age": -0.05}}"#,
    );
    let ctl = FormController::new(transport, &AppConfig::default());
    let page = Page::default();

    let first = pollster::block_on(ctl.submit(form(), &page));
    let second = pollster::block_on(ctl.submit(form(), &page));

    assert_eq!(first, second);
    let chart = page.chart.borrow();
    assert_eq!(chart.host().created.len(), 2);
    assert_eq!(chart.host().alive, vec![2]);
    assert_eq!(chart.host().created[0], chart.host().created[1]);
}

#[test]
fn failed_resubmission_drops_stale_chart() {
    let ok = FormController::new(
        ScriptedTransport::replying(
            200,
            r#"{"prediction_probability": 45, "shap_values": {"chol": 0.1}}"#,
        ),
        &AppConfig::default(),
    );
    let failing = FormController::new(
        ScriptedTransport::failing(PredictError::Timeout(30_000)),
        &AppConfig::default(),
    );
    let page = Page::default();

    let first = pollster::block_on(ok.submit(form(), &page));
    assert!(matches!(first, SubmitOutcome::Rendered(_)));
    assert!(page.chart.borrow().is_live());

    let second = pollster::block_on(failing.submit(form(), &page));
    assert_eq!(second, SubmitOutcome::Failed(PredictError::Timeout(30_000)));

    let mut chart = page.chart.borrow_mut();
    assert!(!chart.is_live());
    assert!(chart.host().alive.is_empty());
    assert_eq!(chart.refresh_theme(Theme::Dark, &NoStyles), Ok(false));
}
