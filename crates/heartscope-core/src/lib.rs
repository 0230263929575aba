#![forbid(unsafe_code)]

//! `heartscope-core` is the browser-independent half of the Heartscope
//! heart-disease risk client.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding environment supplies the HTTP
//!   transport, the page, the chart library and theme storage through small
//!   traits ([`PredictionTransport`], [`View`], [`ChartHost`], [`ThemeStore`]).
//! - **Pure rendering**: ranking, risk tiers and recommendations are plain
//!   functions over plain data.
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//!
//! `heartscope-web` wraps this crate with a `wasm-bindgen` entry point.

pub mod chart;
pub mod color;
pub mod config;
pub mod controller;
pub mod error;
pub mod features;
pub mod input;
pub mod logging;
pub mod markup;
pub mod ranking;
pub mod recommend;
pub mod render;
pub mod response;
pub mod risk;
pub mod theme;

pub use chart::{
    ChartAdapter, ChartColors, ChartConfig, ChartError, ChartHost, ChartOptions, NoStyles,
    StyleSource, toggle_theme,
};
pub use config::{AppConfig, ConfigError};
pub use controller::{FormController, PredictRequest, PredictionTransport, SubmitOutcome, View};
pub use error::{PredictError, PredictResult};
pub use features::{FeatureContract, FeatureNameMap};
pub use input::FormInput;
pub use ranking::{Direction, LabeledFactor, RankedFactor, RankingConfig};
pub use recommend::{DuplicatePolicy, Recommendation};
pub use render::{RenderSettings, ResultView, render_result};
pub use response::{HttpReply, PredictionResponse, ShapValues};
pub use risk::RiskTier;
pub use theme::{MemoryThemeStore, Theme, ThemeState, ThemeStore};
