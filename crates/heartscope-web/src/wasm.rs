#![forbid(unsafe_code)]

use std::cell::RefCell;
use std::rc::Rc;

use heartscope_core::controller::SubmitOutcome;
use heartscope_core::{AppConfig, FormController, Theme, ThemeState, toggle_theme};
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event};

use crate::console::BrowserConsole;
use crate::dom::{DomPage, element};
use crate::fetch::FetchTransport;
use crate::ids;
use crate::js_message;
use crate::storage::LocalThemeStore;

type Listener = Closure<dyn FnMut(Event)>;

/// Shared state behind every event listener.
struct App {
    controller: FormController<FetchTransport>,
    page: DomPage,
    theme: RefCell<ThemeState>,
    store: LocalThemeStore,
}

impl App {
    async fn submit(&self) {
        let fields = match self.page.read_fields() {
            Ok(fields) => fields,
            Err(e) => {
                tracing::error!(error = %js_message(&e), "form not readable");
                return;
            }
        };
        if let SubmitOutcome::Ignored = self.controller.submit(fields, &self.page).await {
            tracing::debug!("submit ignored while busy");
        }
    }

    fn toggle_theme(&self) -> Theme {
        let (Ok(mut state), Ok(mut chart)) =
            (self.theme.try_borrow_mut(), self.page.chart().try_borrow_mut())
        else {
            tracing::warn!("theme toggle skipped, state is busy");
            return self.page_theme();
        };
        toggle_theme(
            &mut *state,
            &self.store,
            &mut *chart,
            self.page.style(),
            |theme| self.page.apply_theme(theme),
        )
    }

    fn page_theme(&self) -> Theme {
        self.theme
            .try_borrow()
            .map(|s| s.current())
            .unwrap_or_default()
    }
}

/// Heart-disease risk form bound to the current page.
///
/// Mounting resolves every element, restores the persisted theme and wires
/// the form's `submit` and the theme toggle's `click` listeners.
#[wasm_bindgen]
pub struct HeartscopeWeb {
    app: Rc<App>,
    form: Element,
    toggle: Element,
    on_submit: Option<Listener>,
    on_toggle: Option<Listener>,
}

#[wasm_bindgen]
impl HeartscopeWeb {
    /// Mount on the current document. `config` is an optional JSON object.
    #[wasm_bindgen(constructor)]
    pub fn new(config: Option<String>) -> Result<HeartscopeWeb, JsValue> {
        let config = AppConfig::from_json(config.as_deref().unwrap_or_default())
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let level = config
            .level_filter()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        heartscope_core::logging::install(BrowserConsole, level);

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("window has no document"))?;
        let page = DomPage::resolve(&window)?;
        let toggle = element(&document, ids::THEME_TOGGLE)?;

        let store = LocalThemeStore;
        let theme = ThemeState::load(&store, config.theme_storage_key.as_str());
        page.apply_theme(theme.current());

        let app = Rc::new(App {
            controller: FormController::new(FetchTransport::new(window), &config),
            page,
            theme: RefCell::new(theme),
            store,
        });
        let form: Element = app.page.form().clone().into();

        let mut mounted = Self {
            app,
            form,
            toggle,
            on_submit: None,
            on_toggle: None,
        };
        mounted.attach()?;
        tracing::info!(endpoint = %config.endpoint, "heartscope mounted");
        Ok(mounted)
    }

    /// Current theme, `"light"` or `"dark"`.
    pub fn theme(&self) -> String {
        self.app.page_theme().as_str().to_string()
    }

    /// Flip the theme as the toggle button would. Returns the new theme.
    #[wasm_bindgen(js_name = toggleTheme)]
    pub fn toggle_theme(&self) -> String {
        self.app.toggle_theme().as_str().to_string()
    }

    /// Whether a prediction request is in flight.
    #[wasm_bindgen(js_name = isBusy)]
    pub fn is_busy(&self) -> bool {
        self.app.controller.is_busy()
    }

    /// Detach listeners and destroy the chart.
    pub fn destroy(&mut self) {
        if let Some(cb) = self.on_submit.take() {
            if let Err(e) = self
                .form
                .remove_event_listener_with_callback("submit", cb.as_ref().unchecked_ref())
            {
                tracing::warn!(error = %js_message(&e), "submit listener not removed");
            }
        }
        if let Some(cb) = self.on_toggle.take() {
            if let Err(e) = self
                .toggle
                .remove_event_listener_with_callback("click", cb.as_ref().unchecked_ref())
            {
                tracing::warn!(error = %js_message(&e), "click listener not removed");
            }
        }
        if let Ok(mut chart) = self.app.page.chart().try_borrow_mut() {
            chart.clear();
        }
    }
}

impl HeartscopeWeb {
    fn attach(&mut self) -> Result<(), JsValue> {
        let app = Rc::clone(&self.app);
        let on_submit = Listener::new(move |event: Event| {
            event.prevent_default();
            let app = Rc::clone(&app);
            wasm_bindgen_futures::spawn_local(async move { app.submit().await });
        });
        self.form
            .add_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref())?;
        self.on_submit = Some(on_submit);

        let app = Rc::clone(&self.app);
        let on_toggle = Listener::new(move |_event: Event| {
            app.toggle_theme();
        });
        self.toggle
            .add_event_listener_with_callback("click", on_toggle.as_ref().unchecked_ref())?;
        self.on_toggle = Some(on_toggle);
        Ok(())
    }
}
