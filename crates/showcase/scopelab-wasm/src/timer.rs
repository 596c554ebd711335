//! Browser clock: `Date` for wall time, `setTimeout` for delays.

use std::time::Duration;

use chrono::{DateTime, Local};
use futures::FutureExt;
use js_sys::Promise;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;

use scopelab_core::{Clock, SleepFuture};

#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserClock;

impl Clock for BrowserClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn sleep(&self, delay: Duration) -> SleepFuture {
        let ms = delay.as_millis().min(i32::MAX as u128) as i32;
        let promise = Promise::new(&mut |resolve, _reject| {
            let scheduled = web_sys::window().map(|w| {
                w.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
            });
            if !matches!(scheduled, Some(Ok(_))) {
                // No window (worker) or setTimeout refused: resolve on the next microtask.
                let _ = resolve.call0(&JsValue::UNDEFINED);
            }
        });
        async move {
            if let Err(err) = JsFuture::from(promise).await {
                log::warn!("timer promise rejected: {err:?}");
            }
        }
        .boxed_local()
    }
}
