#![forbid(unsafe_code)]

//! WASM frontend for Heartscope.
//!
//! This crate is intentionally host-specific (web/WASM). It binds
//! `heartscope-core` to the browser:
//! - the form's `submit` event drives a [`heartscope_core::FormController`]
//!   over `window.fetch`,
//! - results render into the page and a Chart.js bar chart,
//! - the theme persists in `localStorage`,
//! - `tracing` output goes to the developer console.

pub mod failure;
pub mod ids;

#[cfg(target_arch = "wasm32")]
mod chartjs;
#[cfg(target_arch = "wasm32")]
mod console;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod fetch;
#[cfg(target_arch = "wasm32")]
mod storage;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::HeartscopeWeb;

/// Best-effort text for a thrown JS value.
#[cfg(target_arch = "wasm32")]
fn js_message(value: &wasm_bindgen::JsValue) -> String {
    use wasm_bindgen::JsCast;

    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

/// Native builds compile this crate as a stub so `cargo check --workspace` stays
/// green on non-wasm targets. It only validates the mount config.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct HeartscopeWeb {
    config: heartscope_core::AppConfig,
}

#[cfg(not(target_arch = "wasm32"))]
impl HeartscopeWeb {
    pub fn new(config: Option<&str>) -> Result<Self, heartscope_core::ConfigError> {
        Ok(Self {
            config: heartscope_core::AppConfig::from_json(config.unwrap_or_default())?,
        })
    }

    #[must_use]
    pub fn config(&self) -> &heartscope_core::AppConfig {
        &self.config
    }
}
