//! `wasm-bindgen` bridge between the runtime and a JavaScript checklist application.

use checklist_runtime::{
    export_document, import_document, start_clock, BootSequencer, ChecklistConsumer,
    ConsumerContext, OutboundMessage, PersistedDocument,
};
use futures::{channel::mpsc, StreamExt};
use leptos::logging;
use platform_host_web::build_platform_services;
use serde::Serialize;
use wasm_bindgen::{closure::Closure, prelude::wasm_bindgen, JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, String> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|err| err.to_string())
}

/// Looks up `app.ports[port][method]`, returning the port object and the bound function.
fn port_method(app: &JsValue, port: &str, method: &str) -> Option<(JsValue, js_sys::Function)> {
    let ports = js_sys::Reflect::get(app, &JsValue::from_str("ports")).ok()?;
    let port = js_sys::Reflect::get(&ports, &JsValue::from_str(port)).ok()?;
    let function = js_sys::Reflect::get(&port, &JsValue::from_str(method))
        .ok()?
        .dyn_into::<js_sys::Function>()
        .ok()?;
    Some((port, function))
}

/// Checklist application implemented in JavaScript and started through its `init` function.
pub struct JsChecklistApp {
    init: js_sys::Function,
}

impl JsChecklistApp {
    /// Wraps the application's `init(flags)` function.
    pub fn new(init: js_sys::Function) -> Self {
        Self { init }
    }

    fn start_app(&self, context: &ConsumerContext) -> Result<JsValue, String> {
        let flags = to_js(&context.flags)?;
        self.init
            .call1(&JsValue::NULL, &flags)
            .map_err(|err| format!("application init threw: {err:?}"))
    }

    fn subscribe_outbound(app: &JsValue, context: &ConsumerContext) -> Result<(), String> {
        let (port, subscribe) = port_method(app, "outPort", "subscribe")
            .ok_or_else(|| "application has no ports.outPort.subscribe".to_string())?;

        let outbound = context.outbound.clone();
        let on_message = Closure::<dyn FnMut(JsValue)>::wrap(Box::new(move |message: JsValue| {
            let value = match serde_wasm_bindgen::from_value::<serde_json::Value>(message) {
                Ok(value) => value,
                Err(err) => {
                    logging::warn!("outbound message is not JSON-compatible: {err}");
                    return;
                }
            };
            if outbound
                .unbounded_send(OutboundMessage::from_json(value))
                .is_err()
            {
                logging::warn!("runtime stopped; outbound message dropped");
            }
        }));
        subscribe
            .call1(&port, on_message.as_ref())
            .map_err(|err| format!("outPort.subscribe threw: {err:?}"))?;
        // The subscription is permanent.
        on_message.forget();
        Ok(())
    }

    fn forward_ticks(app: &JsValue, context: &ConsumerContext) {
        let Some((port, send)) = port_method(app, "tick", "send") else {
            return;
        };
        let (sink, mut receiver) = mpsc::unbounded();
        // Detached: ticks run for the life of the page.
        let _ticks = start_clock(
            context.platform.timers.as_ref(),
            context.clock.clone(),
            context.config.clock_interval_ms,
            sink,
        );
        spawn_local(async move {
            while let Some(message) = receiver.next().await {
                match to_js(&message) {
                    Ok(js) => {
                        if let Err(err) = send.call1(&port, &js) {
                            logging::warn!("tick.send threw: {err:?}");
                        }
                    }
                    Err(err) => logging::warn!("tick serialize failed: {err}"),
                }
            }
        });
    }
}

impl ChecklistConsumer for JsChecklistApp {
    fn start(&mut self, context: ConsumerContext) {
        let app = match self.start_app(&context) {
            Ok(app) => app,
            Err(err) => {
                logging::error!("{err}");
                return;
            }
        };
        if let Err(err) = Self::subscribe_outbound(&app, &context) {
            logging::warn!("saves will not be persisted: {err}");
        }
        Self::forward_ticks(&app, &context);
    }
}

/// Boots the runtime for the JavaScript application whose `init` function is given.
///
/// `config_json` optionally overrides [`checklist_runtime::BootConfig`] fields.
#[wasm_bindgen]
pub fn boot(init: js_sys::Function, config_json: Option<String>) {
    console_error_panic_hook::set_once();
    let config = crate::boot_config_from_override(config_json.as_deref());
    let mut app = JsChecklistApp::new(init);
    let runtime = BootSequencer::new(build_platform_services(), config).boot(&mut app);
    spawn_local(runtime.run());
}

/// Downloads `document` (a `{ version, checklists }` object) as a JSON file.
#[wasm_bindgen]
pub fn export_checklists(document: JsValue, config_json: Option<String>) {
    let config = crate::boot_config_from_override(config_json.as_deref());
    let document = match serde_wasm_bindgen::from_value::<PersistedDocument>(document) {
        Ok(document) => document,
        Err(err) => {
            logging::warn!("export skipped, document is malformed: {err}");
            return;
        }
    };
    let platform = build_platform_services();
    if let Err(err) = export_document(platform.files.as_ref(), &config, &document) {
        logging::warn!("export failed: {err}");
    }
}

/// Opens a file picker and calls `on_imported` with the decoded document.
///
/// Files that match neither checklist schema are logged and not reported. Cancelled pickers
/// never call back.
#[wasm_bindgen]
pub fn import_checklists(on_imported: js_sys::Function, config_json: Option<String>) {
    let config = crate::boot_config_from_override(config_json.as_deref());
    let platform = build_platform_services();
    import_document(platform.files.as_ref(), &config, move |result| {
        let document = match result {
            Ok(document) => document,
            Err(err) => {
                logging::warn!("import rejected: {err}");
                return;
            }
        };
        match to_js(&document) {
            Ok(js) => {
                if let Err(err) = on_imported.call1(&JsValue::NULL, &js) {
                    logging::warn!("import callback threw: {err:?}");
                }
            }
            Err(err) => logging::warn!("import serialize failed: {err}"),
        }
    });
}
