//! Browser text download and file-picker service.
//!
//! Downloads go through a temporary object URL on a hidden anchor. Picks go through a
//! transient `<input type="file">` and a `FileReader`. A dismissed picker never reports back,
//! so its callback simply never runs.

use leptos::logging;
use platform_host::{FileTextCallback, FileTransferService};

#[cfg(target_arch = "wasm32")]
use std::{cell::RefCell, rc::Rc};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{closure::Closure, JsCast, JsValue};

#[derive(Debug, Clone, Copy, Default)]
/// File transfer service backed by DOM download anchors and file inputs.
pub struct WebFileTransferService;

impl FileTransferService for WebFileTransferService {
    fn download_as_file(&self, filename: &str, content: &str, mime_type: &str) {
        if let Err(err) = download_text(filename, content, mime_type) {
            logging::warn!("download of `{filename}` failed: {err}");
        }
    }

    fn pick_file_text(&self, accept: &str, on_loaded: FileTextCallback) {
        if let Err(err) = open_text_picker(accept, on_loaded) {
            logging::warn!("file picker failed to open: {err}");
        }
    }
}

fn download_text(filename: &str, content: &str, mime_type: &str) -> Result<(), String> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = (filename, content, mime_type);
        Err("file downloads are only available when compiled for wasm32".to_string())
    }

    #[cfg(target_arch = "wasm32")]
    {
        let window = web_sys::window().ok_or_else(|| "window unavailable".to_string())?;
        let document = window
            .document()
            .ok_or_else(|| "document unavailable".to_string())?;

        let parts = js_sys::Array::of1(&JsValue::from_str(content));
        let options = web_sys::BlobPropertyBag::new();
        options.set_type(mime_type);
        let blob = web_sys::Blob::new_with_str_sequence_and_options(&parts, &options)
            .map_err(|err| format!("failed to create blob: {err:?}"))?;
        let url = web_sys::Url::create_object_url_with_blob(&blob)
            .map_err(|err| format!("failed to create object url: {err:?}"))?;

        let anchor = document
            .create_element("a")
            .map_err(|err| format!("failed to create download anchor: {err:?}"))?
            .dyn_into::<web_sys::HtmlAnchorElement>()
            .map_err(|_| "failed to cast download anchor".to_string())?;
        anchor.set_href(&url);
        anchor.set_download(filename);

        if let Some(body) = document.body() {
            let _ = body.append_child(&anchor);
        }
        anchor.click();
        anchor.remove();
        let _ = web_sys::Url::revoke_object_url(&url);
        Ok(())
    }
}

fn open_text_picker(accept: &str, on_loaded: FileTextCallback) -> Result<(), String> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = (accept, on_loaded);
        Err("file pickers are only available when compiled for wasm32".to_string())
    }

    #[cfg(target_arch = "wasm32")]
    {
        let window = web_sys::window().ok_or_else(|| "window unavailable".to_string())?;
        let document = window
            .document()
            .ok_or_else(|| "document unavailable".to_string())?;
        let input = document
            .create_element("input")
            .map_err(|err| format!("failed to create file input: {err:?}"))?
            .dyn_into::<web_sys::HtmlInputElement>()
            .map_err(|_| "failed to cast file input".to_string())?;
        input.set_type("file");
        input.set_accept(accept);

        let pending = Rc::new(RefCell::new(Some(on_loaded)));
        let input_for_change = input.clone();
        let on_change = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |_| {
            let Some(file) = input_for_change.files().and_then(|files| files.get(0)) else {
                return;
            };
            let Some(on_loaded) = pending.borrow_mut().take() else {
                return;
            };
            if let Err(err) = read_file_text(&file, on_loaded) {
                logging::warn!("file read failed to start: {err}");
            }
        }));
        input.set_onchange(Some(on_change.as_ref().unchecked_ref()));
        input.click();
        // The input may fire long after this returns, or never.
        on_change.forget();
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
fn read_file_text(file: &web_sys::File, on_loaded: FileTextCallback) -> Result<(), String> {
    let reader = web_sys::FileReader::new().map_err(|err| format!("{err:?}"))?;
    let reader_for_load = reader.clone();
    let mut on_loaded = Some(on_loaded);
    let on_load = Closure::<dyn FnMut(web_sys::ProgressEvent)>::wrap(Box::new(move |_| {
        let text = reader_for_load
            .result()
            .ok()
            .and_then(|value| value.as_string());
        match (text, on_loaded.take()) {
            (Some(text), Some(on_loaded)) => on_loaded(text),
            (None, _) => logging::warn!("file reader returned non-text result"),
            (Some(_), None) => {}
        }
    }));
    reader.set_onload(Some(on_load.as_ref().unchecked_ref()));
    reader
        .read_as_text(file)
        .map_err(|err| format!("failed to start file read: {err:?}"))?;
    on_load.forget();
    Ok(())
}
