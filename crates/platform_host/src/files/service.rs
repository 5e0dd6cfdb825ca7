//! Text file export/import contracts and in-memory adapters.

use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use futures::channel::oneshot;

/// MIME filter used by default for file pickers.
pub const JSON_MIME_TYPE: &str = "application/json";

/// Single-shot callback receiving the full text of a picked file.
pub type FileTextCallback = Box<dyn FnOnce(String) + 'static>;

/// Host service for client-side text downloads and file-picker uploads.
pub trait FileTransferService {
    /// Triggers a save of `content` under `filename` with the given MIME type.
    fn download_as_file(&self, filename: &str, content: &str, mime_type: &str);

    /// Opens a file picker restricted (advisorily) to `accept`.
    ///
    /// `on_loaded` fires at most once with the text of the first selected file. It never fires
    /// when the user cancels the selection.
    fn pick_file_text(&self, accept: &str, on_loaded: FileTextCallback);
}

/// Awaits [`FileTransferService::pick_file_text`] through a oneshot channel.
///
/// Resolves to `None` when the service drops the callback without calling it. A browser picker
/// that is simply dismissed keeps the callback alive, so the future stays pending.
pub async fn pick_file_text_async<S: FileTransferService + ?Sized>(
    service: &S,
    accept: &str,
) -> Option<String> {
    let (tx, rx) = oneshot::channel::<String>();
    service.pick_file_text(
        accept,
        Box::new(move |text| {
            let _ = tx.send(text);
        }),
    );
    rx.await.ok()
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op file service for unsupported targets. Pickers never complete.
pub struct NoopFileTransferService;

impl FileTransferService for NoopFileTransferService {
    fn download_as_file(&self, _filename: &str, _content: &str, _mime_type: &str) {}

    fn pick_file_text(&self, _accept: &str, _on_loaded: FileTextCallback) {}
}

/// A download captured by [`MemoryFileTransferService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedDownload {
    /// Suggested file name.
    pub filename: String,
    /// Full text content.
    pub content: String,
    /// MIME type passed with the download.
    pub mime_type: String,
}

#[derive(Debug, Default)]
struct MemoryFileTransferState {
    downloads: Vec<RecordedDownload>,
    queued_picks: VecDeque<String>,
    pick_filters: Vec<String>,
}

#[derive(Debug, Clone, Default)]
/// In-memory file service that records downloads and answers picks from a queue.
///
/// A pick with an empty queue behaves like a cancelled selection: the callback is dropped
/// without being called.
pub struct MemoryFileTransferService {
    inner: Rc<RefCell<MemoryFileTransferState>>,
}

impl MemoryFileTransferService {
    /// Queues the text returned by the next pick.
    pub fn queue_pick(&self, text: impl Into<String>) {
        self.inner.borrow_mut().queued_picks.push_back(text.into());
    }

    /// Returns every download recorded so far, oldest first.
    pub fn downloads(&self) -> Vec<RecordedDownload> {
        self.inner.borrow().downloads.clone()
    }

    /// Returns the `accept` filters of every pick requested so far.
    pub fn pick_filters(&self) -> Vec<String> {
        self.inner.borrow().pick_filters.clone()
    }
}

impl FileTransferService for MemoryFileTransferService {
    fn download_as_file(&self, filename: &str, content: &str, mime_type: &str) {
        self.inner.borrow_mut().downloads.push(RecordedDownload {
            filename: filename.to_string(),
            content: content.to_string(),
            mime_type: mime_type.to_string(),
        });
    }

    fn pick_file_text(&self, accept: &str, on_loaded: FileTextCallback) {
        let next = {
            let mut inner = self.inner.borrow_mut();
            inner.pick_filters.push(accept.to_string());
            inner.queued_picks.pop_front()
        };
        if let Some(text) = next {
            on_loaded(text);
        }
    }
}
