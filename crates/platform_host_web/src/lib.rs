//! Browser (`wasm32`) implementations of [`platform_host`] service contracts.
//!
//! This crate is the concrete browser-side host wiring layer for persistent storage
//! (`localStorage`), text file download/upload, and repeating timers. On non-wasm targets every
//! adapter degrades to an absent/no-op answer so the workspace still builds and tests natively.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

/// Compile-time host-strategy selection and concrete adapter factories for runtime wiring.
pub mod adapters;
pub mod files;
pub mod storage;
pub mod timer;

pub use adapters::{
    build_platform_services, file_transfer_service, host_strategy_name, persistent_store,
    selected_host_strategy, timer_service, FileTransferAdapter, PersistentStoreAdapter,
    TimerServiceAdapter,
};
pub use files::WebFileTransferService;
pub use storage::local_storage::WebPersistentStore;
pub use timer::WebTimerService;
