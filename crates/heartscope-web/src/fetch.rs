#![forbid(unsafe_code)]

//! `window.fetch` as a [`PredictionTransport`].

use std::cell::Cell;
use std::rc::Rc;

use heartscope_core::controller::{PredictRequest, PredictionTransport};
use heartscope_core::{HttpReply, PredictError, PredictResult};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortController, Headers, Request, RequestInit, Response, Window};

use crate::failure::fetch_failure;
use crate::js_message;

#[derive(Debug, Clone)]
pub struct FetchTransport {
    window: Window,
}

impl FetchTransport {
    pub fn new(window: Window) -> Self {
        Self { window }
    }

    fn build(
        &self,
        request: &PredictRequest<'_>,
        abort: Option<&AbortController>,
    ) -> Result<Request, JsValue> {
        let headers = Headers::new()?;
        headers.set("Content-Type", "application/json")?;

        let init = RequestInit::new();
        init.set_method("POST");
        init.set_headers(&headers);
        init.set_body(&JsValue::from_str(&request.body));
        if let Some(controller) = abort {
            init.set_signal(Some(&controller.signal()));
        }
        Request::new_with_str_and_init(request.endpoint, &init)
    }
}

/// Aborts the request when the timer fires; clears the timer when dropped.
struct Deadline {
    window: Window,
    handle: i32,
    fired: Rc<Cell<bool>>,
    _callback: Closure<dyn FnMut()>,
}

impl Deadline {
    fn arm(window: &Window, controller: AbortController, ms: u64) -> Result<Self, JsValue> {
        let fired = Rc::new(Cell::new(false));
        let flag = Rc::clone(&fired);
        let callback = Closure::<dyn FnMut()>::new(move || {
            flag.set(true);
            controller.abort();
        });
        let handle = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            i32::try_from(ms).unwrap_or(i32::MAX),
        )?;
        Ok(Self {
            window: window.clone(),
            handle,
            fired,
            _callback: callback,
        })
    }

    fn fired(&self) -> bool {
        self.fired.get()
    }
}

impl Drop for Deadline {
    fn drop(&mut self) {
        self.window.clear_timeout_with_handle(self.handle);
    }
}

impl PredictionTransport for FetchTransport {
    async fn post_json(&self, request: PredictRequest<'_>) -> PredictResult<HttpReply> {
        let transport = |e: JsValue| PredictError::Transport(js_message(&e));

        let timeout_ms = request
            .timeout
            .map(|t| u64::try_from(t.as_millis()).unwrap_or(u64::MAX));
        let controller = match timeout_ms {
            Some(_) => Some(AbortController::new().map_err(transport)?),
            None => None,
        };
        let req = self
            .build(&request, controller.as_ref())
            .map_err(transport)?;
        let deadline = match (controller, timeout_ms) {
            (Some(c), Some(ms)) => Some(Deadline::arm(&self.window, c, ms).map_err(transport)?),
            _ => None,
        };

        let failed = |e: JsValue| {
            let fired = deadline.as_ref().is_some_and(Deadline::fired);
            fetch_failure(js_message(&e), timeout_ms, fired)
        };

        let value = JsFuture::from(self.window.fetch_with_request(&req))
            .await
            .map_err(failed)?;
        let response: Response = value
            .dyn_into()
            .map_err(|_| PredictError::Transport("fetch did not return a Response".into()))?;

        let text = JsFuture::from(response.text().map_err(transport)?)
            .await
            .map_err(failed)?;
        drop(deadline);

        Ok(HttpReply::new(
            response.status(),
            text.as_string().unwrap_or_default(),
        ))
    }
}
