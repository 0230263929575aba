#![forbid(unsafe_code)]

//! The page: element lookups and the [`View`] the controller drives.

use std::cell::{Cell, RefCell};

use heartscope_core::Theme;
use heartscope_core::chart::{ChartAdapter, ChartError};
use heartscope_core::controller::View;
use heartscope_core::ranking::LabeledFactor;
use heartscope_core::render::{ResultView, error_html, loading_html};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, FormData, HtmlButtonElement, HtmlFormElement, Window};

use crate::chartjs::ChartJsHost;
use crate::ids::{self, ButtonState, IconVisibility};
use crate::js_message;
use crate::storage::ComputedStyle;

pub fn element(document: &Document, id: &str) -> Result<Element, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing element #{id}")))
}

fn set_hidden(el: &Element, hidden: bool) {
    let classes = el.class_list();
    let result = if hidden {
        classes.add_1(ids::HIDDEN_CLASS)
    } else {
        classes.remove_1(ids::HIDDEN_CLASS)
    };
    if let Err(e) = result {
        tracing::warn!(error = %js_message(&e), "class list update failed");
    }
}

/// Every element the page needs, resolved once at mount.
pub struct DomPage {
    document: Document,
    form: HtmlFormElement,
    button: HtmlButtonElement,
    button_text: Element,
    button_loader: Element,
    result: Element,
    recommendation: Element,
    sun_icon: Element,
    moon_icon: Element,
    chart: RefCell<ChartAdapter<ChartJsHost>>,
    style: ComputedStyle,
    theme: Cell<Theme>,
}

impl DomPage {
    pub fn resolve(window: &Window) -> Result<Self, JsValue> {
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("window has no document"))?;
        let form = element(&document, ids::FORM)?
            .dyn_into::<HtmlFormElement>()
            .map_err(|_| JsValue::from_str("#predict-form is not a <form>"))?;
        let button = element(&document, ids::SUBMIT_BUTTON)?
            .dyn_into::<HtmlButtonElement>()
            .map_err(|_| JsValue::from_str("#predict-button is not a <button>"))?;
        Ok(Self {
            form,
            button,
            button_text: element(&document, ids::BUTTON_TEXT)?,
            button_loader: element(&document, ids::BUTTON_LOADER)?,
            result: element(&document, ids::RESULT_CONTENT)?,
            recommendation: element(&document, ids::RECOMMENDATION)?,
            sun_icon: element(&document, ids::SUN_ICON)?,
            moon_icon: element(&document, ids::MOON_ICON)?,
            chart: RefCell::new(ChartAdapter::new(ChartJsHost::new(document.clone()))),
            style: ComputedStyle::new(window.clone()),
            theme: Cell::new(Theme::default()),
            document,
        })
    }

    pub fn form(&self) -> &HtmlFormElement {
        &self.form
    }

    pub fn style(&self) -> &ComputedStyle {
        &self.style
    }

    pub fn chart(&self) -> &RefCell<ChartAdapter<ChartJsHost>> {
        &self.chart
    }

    /// `(name, value)` pairs in document order. File inputs are skipped.
    pub fn read_fields(&self) -> Result<Vec<(String, String)>, JsValue> {
        let data = FormData::new_with_form(&self.form)?;
        let entries = js_sys::try_iter(data.as_ref())?
            .ok_or_else(|| JsValue::from_str("FormData is not iterable"))?;
        let mut fields = Vec::new();
        for entry in entries {
            let pair = js_sys::Array::from(&entry?);
            if let (Some(name), Some(value)) = (pair.get(0).as_string(), pair.get(1).as_string()) {
                fields.push((name, value));
            }
        }
        Ok(fields)
    }

    /// Restyle the page for `theme`: root class and icons.
    pub fn apply_theme(&self, theme: Theme) {
        self.theme.set(theme);
        if let Some(root) = self.document.document_element() {
            let result = if theme.is_dark() {
                root.class_list().add_1(ids::DARK_CLASS)
            } else {
                root.class_list().remove_1(ids::DARK_CLASS)
            };
            if let Err(e) = result {
                tracing::warn!(error = %js_message(&e), "theme class not applied");
            }
        }
        let icons = IconVisibility::for_theme(theme);
        set_hidden(&self.sun_icon, icons.sun_hidden);
        set_hidden(&self.moon_icon, icons.moon_hidden);
    }
}

impl View for DomPage {
    fn set_busy(&self, busy: bool) {
        let state = ButtonState::for_busy(busy);
        self.button.set_disabled(state.disabled);
        set_hidden(&self.button_text, state.text_hidden);
        set_hidden(&self.button_loader, state.loader_hidden);
    }

    fn show_loading(&self) {
        self.result.set_inner_html(&loading_html());
    }

    fn clear_recommendation(&self) {
        set_hidden(&self.recommendation, true);
        self.recommendation.set_inner_html("");
    }

    fn clear_chart(&self) {
        match self.chart.try_borrow_mut() {
            Ok(mut chart) => chart.clear(),
            Err(_) => tracing::warn!("chart is busy, not cleared"),
        }
    }

    fn show_result(&self, view: &ResultView) {
        self.result.set_inner_html(&view.result_card_html());
        self.recommendation
            .set_inner_html(&view.recommendation_html());
        set_hidden(&self.recommendation, false);
    }

    fn render_chart(&self, factors: &[LabeledFactor]) -> Result<(), ChartError> {
        self.chart
            .try_borrow_mut()
            .map_err(|_| ChartError("chart is busy".into()))?
            .render(factors, self.theme.get(), &self.style)
    }

    fn show_error(&self, message: &str) {
        self.result.set_inner_html(&error_html(message));
    }
}
