//! `setInterval`-backed repeating timer service.

use leptos::logging;
use platform_host::{TickCallback, TimerHandle, TimerService};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{closure::Closure, JsCast};

#[derive(Debug, Clone, Copy, Default)]
/// Timer service backed by `window.setInterval`.
pub struct WebTimerService;

impl TimerService for WebTimerService {
    fn repeat_every(&self, interval_ms: u32, on_tick: TickCallback) -> TimerHandle {
        match start_interval(interval_ms, on_tick) {
            Ok(handle) => handle,
            Err(err) => {
                logging::warn!("interval timer failed to start: {err}");
                TimerHandle::inert()
            }
        }
    }
}

fn start_interval(interval_ms: u32, on_tick: TickCallback) -> Result<TimerHandle, String> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = (interval_ms, on_tick);
        Err("interval timers are only available when compiled for wasm32".to_string())
    }

    #[cfg(target_arch = "wasm32")]
    {
        let window = web_sys::window().ok_or_else(|| "window unavailable".to_string())?;
        let mut on_tick = on_tick;
        // Ownership moves to the JS engine; it is collected once the interval is cleared.
        let callback = Closure::<dyn FnMut()>::wrap(Box::new(move || on_tick())).into_js_value();
        let timeout = i32::try_from(interval_ms).unwrap_or(i32::MAX);
        let interval_id = window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                timeout,
            )
            .map_err(|err| format!("setInterval failed: {err:?}"))?;

        Ok(TimerHandle::new(move || {
            if let Some(window) = web_sys::window() {
                window.clear_interval_with_handle(interval_id);
            }
        }))
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn native_build_returns_inert_handle() {
        let handle = WebTimerService.repeat_every(1_000, Box::new(|| {}));
        assert!(!handle.is_cancelled());
        handle.cancel();
        assert!(handle.is_cancelled());
    }
}
