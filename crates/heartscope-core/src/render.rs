#![forbid(unsafe_code)]

//! Result Renderer: prediction + inputs → view model → HTML fragments.
//!
//! [`render_result`] is pure. The HTML helpers produce the fragments the
//! host injects into the result card and the recommendation card; every
//! piece of dynamic text passes through [`escape_html`].

use std::fmt::Write as _;

use crate::features::FeatureNameMap;
use crate::input::FormInput;
use crate::markup::escape_html;
use crate::ranking::{LabeledFactor, RankingConfig, label_factors, rank};
use crate::recommend::{DuplicatePolicy, Recommendation, recommend};
use crate::response::PredictionResponse;
use crate::risk::RiskTier;

/// DOM id of the canvas the chart binds to.
pub const CHART_CANVAS_ID: &str = "shapChart";

/// Knobs for one render.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderSettings {
    pub ranking: RankingConfig,
    pub duplicate_policy: DuplicatePolicy,
    pub names: FeatureNameMap,
}

/// Everything the result area shows for one prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub probability: f64,
    pub tier: RiskTier,
    pub factors: Vec<LabeledFactor>,
    pub recommendation: Recommendation,
}

/// Build the view model for a validated response.
#[must_use]
pub fn render_result(
    response: &PredictionResponse,
    input: &FormInput,
    settings: &RenderSettings,
) -> ResultView {
    let tier = RiskTier::from_probability(response.probability);
    let ranked = rank(&response.shap_values, &settings.ranking);
    let recommendation = recommend(input, &ranked, &settings.names, settings.duplicate_policy);
    ResultView {
        probability: response.probability,
        tier,
        factors: label_factors(&ranked, &settings.names),
        recommendation,
    }
}

impl ResultView {
    /// Probability as shown, e.g. `82%` or `82.35%`.
    #[must_use]
    pub fn probability_text(&self) -> String {
        format!("{}%", self.probability)
    }

    #[must_use]
    pub fn risk_text(&self) -> String {
        format!("{} Risk", self.tier.label())
    }

    /// Result card: headline figure, tier, chart slot and legend.
    #[must_use]
    pub fn result_card_html(&self) -> String {
        let mut html = String::new();
        html.push_str(
            r#"<h2 class="text-2xl font-semibold text-primary mb-2">Your Analysis Result</h2>"#,
        );
        let _ = write!(
            html,
            r#"<p class="text-6xl font-bold {class}" style="color: {color}">{prob}</p>"#,
            class = self.tier.css_class(),
            color = self.tier.color(),
            prob = escape_html(&self.probability_text()),
        );
        let _ = write!(
            html,
            r#"<p class="text-2xl text-secondary mb-6">{}</p>"#,
            escape_html(&self.risk_text())
        );
        html.push_str(r#"<div class="w-full text-left mb-6">"#);
        html.push_str(
            r#"<h3 class="text-lg font-semibold text-primary mb-3">Risk Factor Analysis (AI)</h3>"#,
        );
        html.push_str(
            r#"<p class="text-sm text-secondary mb-3">This chart shows which factors contribute most to your current risk score.</p>"#,
        );
        let _ = write!(
            html,
            r#"<div class="relative h-80"><canvas id="{CHART_CANVAS_ID}"></canvas></div>"#
        );
        html.push_str(
            r#"<p class="text-xs text-secondary mt-2 text-center"><span class="text-red-500">Red</span>: Increases Risk | <span class="text-blue-500">Blue</span>: Decreases Risk</p>"#,
        );
        html.push_str("</div>");
        html
    }

    /// Recommendation card: heading, bullet list (or neutral line), disclaimer.
    #[must_use]
    pub fn recommendation_html(&self) -> String {
        recommendation_html(&self.recommendation)
    }
}

/// HTML for a recommendation narrative.
#[must_use]
pub fn recommendation_html(rec: &Recommendation) -> String {
    let mut html = String::from(
        r#"<h3 class="text-2xl font-semibold text-primary mb-4">Recommendations &amp; Notes</h3>"#,
    );
    if rec.is_empty() {
        let _ = write!(
            html,
            r#"<p class="text-secondary text-base">{}</p>"#,
            rec.body().first().map(|s| s.to_html()).unwrap_or_default()
        );
    } else {
        html.push_str(r#"<ul class="list-disc list-inside space-y-3 text-secondary text-base">"#);
        for sentence in rec.body() {
            let _ = write!(html, "<li>{}</li>", sentence.to_html());
        }
        html.push_str("</ul>");
    }
    let _ = write!(
        html,
        r#"<p class="text-sm text-secondary italic mt-6 font-medium">{}</p>"#,
        rec.disclaimer().to_html()
    );
    html
}

/// Busy placeholder shown while the request is in flight.
#[must_use]
pub fn loading_html() -> String {
    concat!(
        r#"<h2 class="text-2xl font-semibold text-primary mb-2">Analyzing...</h2>"#,
        r#"<p class="text-secondary">Please wait, the AI is processing your data.</p>"#,
        r#"<div class="animate-spin rounded-full h-12 w-12 border-b-2 border-accent mt-4"></div>"#,
    )
    .to_string()
}

/// Error card for a failed submission.
#[must_use]
pub fn error_html(message: &str) -> String {
    format!(
        r#"<h2 class="text-2xl font-semibold text-red-500 mb-2">Something went wrong</h2><p class="text-secondary">{}</p>"#,
        escape_html(message)
    )
}

/// Plain-text rendering of a view, for logs and non-HTML hosts.
#[must_use]
pub fn plain_summary(view: &ResultView) -> String {
    let mut out = format!("{} ({})\n", view.probability_text(), view.risk_text());
    for f in &view.factors {
        let _ = writeln!(out, "  {:>+.3}  {}  [{}]", f.value, f.label, f.direction().label());
    }
    for line in view.recommendation.to_plain_lines() {
        let _ = writeln!(out, "- {line}");
    }
    out
}
