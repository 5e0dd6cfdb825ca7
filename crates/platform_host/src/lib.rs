//! Typed platform contracts shared by the checklist runtime and its browser adapters.
//!
//! This crate is the API-first boundary for host capabilities: persistent key/value storage,
//! text file download/upload, repeating timers, and wall-clock time. Concrete browser adapters
//! live in `platform_host_web`. In-memory and no-op adapters live here so the runtime can be
//! exercised without a browser.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod files;
pub mod host;
pub mod storage;
pub mod time;
pub mod timer;

pub use files::service::{
    pick_file_text_async, FileTextCallback, FileTransferService, MemoryFileTransferService,
    NoopFileTransferService, RecordedDownload, JSON_MIME_TYPE,
};
pub use host::{HostStrategy, PlatformServices};
pub use storage::persistent::{
    write_persistent_json, MemoryPersistentStore, NoopPersistentStore, NotFound, PersistentStore,
};
pub use time::{unix_time_ms_now, Clock, FixedClock, SystemClock};
pub use timer::{ManualTimerService, NoopTimerService, TickCallback, TimerHandle, TimerService};
