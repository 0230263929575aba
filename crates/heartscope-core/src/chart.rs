#![forbid(unsafe_code)]

//! Contribution bar chart: configuration model and slot lifecycle.
//!
//! [`ChartConfig`] serializes to the object shape Chart.js expects, minus the
//! tooltip callback, which the host attaches (see [`tooltip_label`]). The
//! drawing backend is abstracted behind [`ChartHost`] so that the slot rules
//! can be exercised without a browser:
//!
//! - at most one chart is alive per [`ChartAdapter`];
//! - [`ChartAdapter::render`] destroys the previous chart before creating the
//!   next one;
//! - [`ChartAdapter::refresh_theme`] rewrites only the options (axis and grid
//!   colors) of the live chart, never its data.

use serde::Serialize;

use crate::color::{Rgba, palette};
use crate::ranking::{Direction, LabeledFactor};
use crate::theme::{Theme, ThemeState, ThemeStore};

/// Style variable holding the grid line color.
pub const GRID_COLOR_VAR: &str = "--chart-grid-color";
/// Style variable holding the axis tick color.
pub const TICK_COLOR_VAR: &str = "--chart-tick-color";

const DATASET_LABEL: &str = "Contribution to Risk";
const X_AXIS_TITLE: &str = "SHAP Contribution";
const BAR_ALPHA: f32 = 0.7;

/// Source of the active theme's style variables (computed CSS in a browser).
pub trait StyleSource {
    /// Value of a custom property, if set.
    fn css_var(&self, name: &str) -> Option<String>;
}

/// A style source with nothing set; every lookup falls back.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoStyles;

impl StyleSource for NoStyles {
    fn css_var(&self, _name: &str) -> Option<String> {
        None
    }
}

/// Axis and grid colors for one render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartColors {
    pub grid: String,
    pub tick: String,
}

impl ChartColors {
    /// Built-in colors used when a style variable is missing.
    #[must_use]
    pub fn fallback(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                grid: "rgba(0, 0, 0, 0.1)".into(),
                tick: "#4b5563".into(),
            },
            Theme::Dark => Self {
                grid: "rgba(255, 255, 255, 0.1)".into(),
                tick: "#d1d5db".into(),
            },
        }
    }

    /// Read the style variables now, filling gaps from the theme fallback.
    #[must_use]
    pub fn resolve(style: &dyn StyleSource, theme: Theme) -> Self {
        let fallback = Self::fallback(theme);
        let read = |name: &str| {
            style
                .css_var(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        Self {
            grid: read(GRID_COLOR_VAR).unwrap_or(fallback.grid),
            tick: read(TICK_COLOR_VAR).unwrap_or(fallback.tick),
        }
    }
}

/// Bar fill color for a signed contribution.
#[must_use]
pub fn bar_color(value: f64) -> Rgba {
    border_color(value).with_alpha(BAR_ALPHA)
}

/// Bar border color for a signed contribution.
#[must_use]
pub fn border_color(value: f64) -> Rgba {
    match Direction::of(value) {
        Direction::Increases => palette::RED,
        Direction::Decreases => palette::BLUE,
    }
}

/// Tooltip text for a bar: the direction only, never the number.
#[must_use]
pub fn tooltip_label(value: f64) -> &'static str {
    Direction::of(value).label()
}

// ============================================================================
// Chart.js configuration model
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: &'static str,
    pub data: Vec<f64>,
    pub background_color: Vec<Rgba>,
    pub border_color: Vec<Rgba>,
    pub border_width: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

impl ChartData {
    #[must_use]
    pub fn from_factors(factors: &[LabeledFactor]) -> Self {
        let data: Vec<f64> = factors.iter().map(|f| f.value).collect();
        Self {
            labels: factors.iter().map(|f| f.label.clone()).collect(),
            datasets: vec![Dataset {
                label: DATASET_LABEL,
                background_color: data.iter().copied().map(bar_color).collect(),
                border_color: data.iter().copied().map(border_color).collect(),
                border_width: 1,
                data,
            }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toggle {
    pub display: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorOnly {
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AxisTitle {
    pub display: bool,
    pub text: &'static str,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueAxis {
    pub title: AxisTitle,
    pub ticks: ColorOnly,
    pub grid: ColorOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryAxis {
    pub ticks: ColorOnly,
    pub grid: Toggle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scales {
    pub x: ValueAxis,
    pub y: CategoryAxis,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plugins {
    pub legend: Toggle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub index_axis: &'static str,
    pub responsive: bool,
    pub maintain_aspect_ratio: bool,
    pub plugins: Plugins,
    pub scales: Scales,
}

impl ChartOptions {
    /// Horizontal bars, no legend, themed axes.
    #[must_use]
    pub fn themed(colors: &ChartColors) -> Self {
        Self {
            index_axis: "y",
            responsive: true,
            maintain_aspect_ratio: false,
            plugins: Plugins {
                legend: Toggle { display: false },
            },
            scales: Scales {
                x: ValueAxis {
                    title: AxisTitle {
                        display: false,
                        text: X_AXIS_TITLE,
                        color: colors.tick.clone(),
                    },
                    ticks: ColorOnly {
                        color: colors.tick.clone(),
                    },
                    grid: ColorOnly {
                        color: colors.grid.clone(),
                    },
                },
                y: CategoryAxis {
                    ticks: ColorOnly {
                        color: colors.tick.clone(),
                    },
                    grid: Toggle { display: false },
                },
            },
        }
    }
}

/// Full chart description handed to a [`ChartHost`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub data: ChartData,
    pub options: ChartOptions,
}

impl ChartConfig {
    #[must_use]
    pub fn bar(factors: &[LabeledFactor], colors: &ChartColors) -> Self {
        Self {
            kind: "bar",
            data: ChartData::from_factors(factors),
            options: ChartOptions::themed(colors),
        }
    }
}

// ============================================================================
// Host + slot lifecycle
// ============================================================================

/// Failure reported by a drawing backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("chart backend error: {0}")]
pub struct ChartError(pub String);

/// Drawing backend that owns real chart instances.
pub trait ChartHost {
    /// Opaque handle to one live chart.
    type Handle;

    /// Create and draw a chart in the host's slot.
    fn create(&mut self, config: &ChartConfig) -> Result<Self::Handle, ChartError>;

    /// Release a chart and free its canvas binding.
    fn destroy(&mut self, handle: Self::Handle);

    /// Replace the options of a live chart and redraw it.
    fn update_options(
        &mut self,
        handle: &Self::Handle,
        options: &ChartOptions,
    ) -> Result<(), ChartError>;
}

/// Owns the single chart bound to one display slot.
pub struct ChartAdapter<H: ChartHost> {
    host: H,
    live: Option<H::Handle>,
}

impl<H: ChartHost> std::fmt::Debug for ChartAdapter<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartAdapter")
            .field("live", &self.live.is_some())
            .finish_non_exhaustive()
    }
}

impl<H: ChartHost> ChartAdapter<H> {
    #[must_use]
    pub fn new(host: H) -> Self {
        Self { host, live: None }
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    #[must_use]
    pub fn is_live(&self) -> bool {
        self.live.is_some()
    }

    /// Replace whatever is in the slot with a chart of `factors`.
    ///
    /// Colors are read from `style` now, for `theme`.
    pub fn render(
        &mut self,
        factors: &[LabeledFactor],
        theme: Theme,
        style: &dyn StyleSource,
    ) -> Result<(), ChartError> {
        self.clear();
        let colors = ChartColors::resolve(style, theme);
        let config = ChartConfig::bar(factors, &colors);
        let handle = self.host.create(&config)?;
        self.live = Some(handle);
        tracing::debug!(bars = factors.len(), %theme, "chart rendered");
        Ok(())
    }

    /// Re-read axis/grid colors and apply them to the live chart.
    ///
    /// Returns `Ok(false)` when no chart is displayed.
    pub fn refresh_theme(
        &mut self,
        theme: Theme,
        style: &dyn StyleSource,
    ) -> Result<bool, ChartError> {
        let Some(handle) = self.live.as_ref() else {
            return Ok(false);
        };
        let colors = ChartColors::resolve(style, theme);
        self.host
            .update_options(handle, &ChartOptions::themed(&colors))?;
        tracing::debug!(%theme, "chart theme refreshed");
        Ok(true)
    }

    /// Destroy the live chart, if any.
    pub fn clear(&mut self) {
        if let Some(old) = self.live.take() {
            self.host.destroy(old);
        }
    }
}

/// Theme toggle side channel.
///
/// Flips and persists `state`, lets the host restyle the page through
/// `apply` (so computed styles reflect the new theme), then refreshes the
/// live chart's colors. A chart refresh failure is logged, not returned.
pub fn toggle_theme<H: ChartHost>(
    state: &mut ThemeState,
    store: &dyn ThemeStore,
    chart: &mut ChartAdapter<H>,
    style: &dyn StyleSource,
    apply: impl FnOnce(Theme),
) -> Theme {
    let theme = state.toggle(store);
    apply(theme);
    if let Err(err) = chart.refresh_theme(theme, style) {
        tracing::warn!(error = %err, "chart theme refresh failed");
    }
    theme
}
