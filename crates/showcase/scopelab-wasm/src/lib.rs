use std::rc::Rc;
use std::sync::Once;
use std::time::Duration;

use js_sys::Promise;
use serde::Serialize;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{future_to_promise, spawn_local};

use scopelab_core::{
    format_message as core_format_message, parse_sequence, validate_and_process_input, Config,
    ScopelabError, Session, Severity, Trigger,
};

pub mod dom;
pub mod timer;

pub use dom::DomSurface;
pub use timer::BrowserClock;

static LOGGER: Once = Once::new();

fn init_logging() {
    LOGGER.call_once(|| {
        if console_log::init_with_level(log::Level::Debug).is_err() {
            // Another logger was installed by the host page.
            log::debug!("console_log already initialised");
        }
    });
}

/// JSON-compatible conversion: `None` becomes `null`, maps become plain objects.
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, swb::Error> {
    value.serialize(&swb::Serializer::json_compatible())
}

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

fn to_js_error(err: ScopelabError) -> JsError {
    JsError::new(&format!("{} ({})", err, err.category()))
}

fn to_js_value(err: ScopelabError) -> JsValue {
    to_js_error(err).into()
}

#[wasm_bindgen]
pub struct ScopelabSession {
    core: Rc<Session>,
}

#[wasm_bindgen]
impl ScopelabSession {
    /// Create a session bound to `window.document`. Pass a JSON config object
    /// or undefined/null for defaults.
    /// Example:
    ///   new ScopelabSession({ step_delay_ms: 500 })
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<ScopelabSession, JsError> {
        console_error_panic_hook::set_once();
        init_logging();

        let cfg: Config = if jsvalue_is_undefined_or_null(&config) {
            Config::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };
        let surface = DomSurface::from_window().map_err(to_js_error)?;
        let core = Session::new(Rc::new(surface), Rc::new(BrowserClock), cfg);
        Ok(ScopelabSession {
            core: Rc::new(core),
        })
    }

    /// Dispatch a trigger object such as `{ action: "open_modal", modal: "demo" }`.
    /// Resolves with the outcome object.
    #[wasm_bindgen]
    pub fn dispatch(&self, trigger: JsValue) -> Result<Promise, JsError> {
        let trigger: Trigger =
            swb::from_value(trigger).map_err(|e| JsError::new(&format!("trigger error: {e}")))?;
        let core = Rc::clone(&self.core);
        Ok(future_to_promise(async move {
            let outcome = core.dispatch(trigger).await.map_err(to_js_value)?;
            to_js(&outcome)
                .map_err(|e| JsValue::from(JsError::new(&format!("outcome error: {e}"))))
        }))
    }

    /// Run an animation sequence. `steps` is an array of animation names.
    #[wasm_bindgen(js_name = run_sequence)]
    pub fn run_sequence(
        &self,
        target: String,
        steps: JsValue,
        delay_ms: Option<u32>,
    ) -> Result<Promise, JsError> {
        let names: Vec<String> =
            swb::from_value(steps).map_err(|e| JsError::new(&format!("steps error: {e}")))?;
        let steps = parse_sequence(&names).map_err(to_js_error)?;
        let core = Rc::clone(&self.core);
        Ok(future_to_promise(async move {
            let delay = delay_ms.map(|ms| Duration::from_millis(u64::from(ms)));
            let summary = core
                .runner()
                .run(&target, &steps, delay)
                .await
                .map_err(to_js_value)?;
            to_js(&summary)
                .map_err(|e| JsValue::from(JsError::new(&format!("summary error: {e}"))))
        }))
    }

    /// Append to a log surface. Returns the rendered line.
    #[wasm_bindgen]
    pub fn log(
        &self,
        message: String,
        severity: Option<String>,
        surface: Option<String>,
    ) -> Result<String, JsError> {
        let severity = severity.as_deref().map(Severity::from_tag).unwrap_or_default();
        self.core
            .log()
            .append(&message, surface.as_deref(), severity)
            .map(|entry| entry.rendered)
            .map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = clear_log)]
    pub fn clear_log(&self, surface: Option<String>) -> Result<(), JsError> {
        self.core.log().clear(surface.as_deref()).map_err(to_js_error)
    }

    /// Show or hide a modal. The content reset after hiding runs in the background.
    #[wasm_bindgen(js_name = set_modal_visible)]
    pub fn set_modal_visible(&self, modal_id: String, visible: bool) -> Result<(), JsError> {
        let reset = self
            .core
            .visibility()
            .set_modal_visible(&modal_id, visible)
            .map_err(to_js_error)?;
        if let Some(reset) = reset {
            spawn_local(async move {
                if let Err(err) = reset.await {
                    log::warn!("modal '{modal_id}' reset failed: {err}");
                }
            });
        }
        Ok(())
    }

    #[wasm_bindgen(js_name = set_loader_visible)]
    pub fn set_loader_visible(
        &self,
        container_id: String,
        visible: bool,
        message: Option<String>,
    ) -> Result<(), JsError> {
        self.core
            .visibility()
            .set_loader_visible(&container_id, visible, message.as_deref())
            .map_err(to_js_error)
    }

    /// Validate and process text input. Returns `{ success, error, data }`.
    #[wasm_bindgen(js_name = validate_input)]
    pub fn validate_input(&self, input: String, max_length: Option<u32>) -> Result<JsValue, JsError> {
        let max = max_length.map_or(self.core.config().max_input_length, |m| m as usize);
        let result = validate_and_process_input(&input, max);
        to_js(&result).map_err(|e| JsError::new(&format!("result error: {e}")))
    }

    /// Diagnostics recorded so far (missing elements, rejected runs).
    #[wasm_bindgen]
    pub fn diagnostics(&self) -> Result<JsValue, JsError> {
        to_js(&self.core.diagnostics().records())
            .map_err(|e| JsError::new(&format!("diagnostics error: {e}")))
    }

    #[wasm_bindgen(js_name = animation_count)]
    pub fn animation_count(&self) -> u32 {
        self.core.counter().total()
    }

    #[wasm_bindgen(js_name = random_animation)]
    pub fn random_animation(&self) -> String {
        self.core.pick_random_animation().to_string()
    }
}

/// Format a message the way the log does, stamped with the current time.
#[wasm_bindgen(js_name = format_message)]
pub fn format_message(message: &str, severity: Option<String>) -> String {
    let severity = severity.as_deref().map(Severity::from_tag).unwrap_or_default();
    core_format_message(message, severity, &BrowserClock)
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
