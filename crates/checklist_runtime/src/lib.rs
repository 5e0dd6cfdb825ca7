//! Startup and persistence runtime for the checklist application.
//!
//! On boot the runtime resolves the stored checklist document through three tiers (the current
//! `{version, checklists}` document, then the schema-0 bare list, then an empty default), starts
//! the application with the result and a startup timestamp, and from then on writes every `save`
//! message the application emits back to storage.
//!
//! All host access goes through [`platform_host::PlatformServices`], so the same runtime drives a
//! browser build and the in-memory host used in tests.
//!
//! # Example
//!
//! ```rust
//! use checklist_runtime::{BootConfig, BootSequencer, BootSource, ConsumerContext};
//! use platform_host::{
//!     ManualTimerService, MemoryFileTransferService, MemoryPersistentStore, PlatformServices,
//! };
//!
//! let storage = MemoryPersistentStore::with_entries([("checklists", r#"[{"id":"y"}]"#)]);
//! let platform = PlatformServices::memory(
//!     storage,
//!     MemoryFileTransferService::default(),
//!     ManualTimerService::default(),
//! );
//!
//! let mut consumer = |context: ConsumerContext| {
//!     assert_eq!(context.flags.data.version, 1);
//! };
//! let runtime = BootSequencer::new(platform, BootConfig::default()).boot(&mut consumer);
//! assert_eq!(runtime.source(), BootSource::Legacy);
//! ```

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod config;
pub mod messages;
pub mod migration;
pub mod model;
pub mod runtime;
pub mod ticks;
pub mod transfer;

pub use config::{
    BootConfig, ConfigError, CLOCK_INTERVAL_MS, DATA_KEY, EXPORT_FILENAME, LEGACY_CHECKLISTS_KEY,
};
pub use messages::{InboundMessage, MessageOutcome, OutboundMessage, SAVE_MESSAGE_TYPE};
pub use migration::{
    decode_current, decode_legacy, resolve_document, BootSource, BootState, DecodeError,
    ResolvedDocument,
};
pub use model::{BootFlags, Checklist, LegacyChecklists, PersistedDocument, CURRENT_SCHEMA_VERSION};
pub use runtime::{
    BootSequencer, ChecklistConsumer, ChecklistRuntime, ConsumerContext, OutboundSender,
    PersistError,
};
pub use ticks::{start_clock, InboundReceiver};
pub use transfer::{
    decode_imported, export_document, import_document, import_document_async, ImportError,
};
