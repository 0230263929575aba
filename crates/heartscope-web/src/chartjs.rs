#![forbid(unsafe_code)]

//! Chart.js bindings and the [`ChartHost`] backed by them.
//!
//! Configs are serialized with `serde_json` and parsed into plain JS objects.
//! The tooltip label callback cannot travel through JSON, so it is attached
//! afterwards and kept alive by the handle.

use heartscope_core::chart::{ChartConfig, ChartError, ChartHost, ChartOptions, tooltip_label};
use heartscope_core::render::CHART_CANVAS_ID;
use js_sys::{Object, Reflect};
use wasm_bindgen::prelude::*;
use web_sys::Document;

use crate::js_message;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = Chart)]
    type JsChart;

    #[wasm_bindgen(constructor, js_class = "Chart", catch)]
    fn new(canvas: &JsValue, config: &JsValue) -> Result<JsChart, JsValue>;

    #[wasm_bindgen(method)]
    fn destroy(this: &JsChart);

    #[wasm_bindgen(method)]
    fn update(this: &JsChart);

    #[wasm_bindgen(method, setter = options)]
    fn set_options(this: &JsChart, options: &JsValue);
}

type TooltipFn = Closure<dyn Fn(JsValue) -> JsValue>;

/// One live Chart.js instance plus the callback it references.
pub struct ChartHandle {
    chart: JsChart,
    tooltip: TooltipFn,
}

/// Draws into the `<canvas>` with id [`CHART_CANVAS_ID`].
#[derive(Debug, Clone)]
pub struct ChartJsHost {
    document: Document,
}

impl ChartJsHost {
    pub fn new(document: Document) -> Self {
        Self { document }
    }
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, ChartError> {
    let json = serde_json::to_string(value).map_err(|e| ChartError(e.to_string()))?;
    js_sys::JSON::parse(&json).map_err(|e| ChartError(js_message(&e)))
}

fn set(target: &JsValue, key: &str, value: &JsValue) -> Result<(), ChartError> {
    Reflect::set(target, &JsValue::from_str(key), value)
        .map(|_| ())
        .map_err(|e| ChartError(js_message(&e)))
}

/// `options.plugins.tooltip.callbacks.label = tooltip`
fn attach_tooltip(options: &JsValue, tooltip: &TooltipFn) -> Result<(), ChartError> {
    let plugins = Reflect::get(options, &JsValue::from_str("plugins"))
        .ok()
        .filter(JsValue::is_object)
        .unwrap_or_else(|| Object::new().into());
    let callbacks = Object::new();
    set(&callbacks, "label", tooltip.as_ref())?;
    let tip = Object::new();
    set(&tip, "callbacks", &callbacks)?;
    set(&plugins, "tooltip", &tip)?;
    set(options, "plugins", &plugins)
}

fn tooltip_callback() -> TooltipFn {
    Closure::new(|context: JsValue| {
        let raw = Reflect::get(&context, &JsValue::from_str("raw"))
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        JsValue::from_str(tooltip_label(raw))
    })
}

impl ChartHost for ChartJsHost {
    type Handle = ChartHandle;

    fn create(&mut self, config: &ChartConfig) -> Result<ChartHandle, ChartError> {
        let canvas = self
            .document
            .get_element_by_id(CHART_CANVAS_ID)
            .ok_or_else(|| ChartError(format!("no element with id '{CHART_CANVAS_ID}'")))?;
        let js_config = to_js(config)?;
        let options = Reflect::get(&js_config, &JsValue::from_str("options"))
            .map_err(|e| ChartError(js_message(&e)))?;
        let tooltip = tooltip_callback();
        attach_tooltip(&options, &tooltip)?;

        let chart =
            JsChart::new(canvas.as_ref(), &js_config).map_err(|e| ChartError(js_message(&e)))?;
        Ok(ChartHandle { chart, tooltip })
    }

    fn destroy(&mut self, handle: ChartHandle) {
        handle.chart.destroy();
    }

    fn update_options(
        &mut self,
        handle: &ChartHandle,
        options: &ChartOptions,
    ) -> Result<(), ChartError> {
        let js_options = to_js(options)?;
        attach_tooltip(&js_options, &handle.tooltip)?;
        handle.chart.set_options(&js_options);
        handle.chart.update();
        Ok(())
    }
}
