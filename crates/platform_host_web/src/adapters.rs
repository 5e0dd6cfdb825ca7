use std::rc::Rc;

use platform_host::{
    FileTextCallback, FileTransferService, HostStrategy, NoopFileTransferService,
    NoopPersistentStore, NoopTimerService, NotFound, PersistentStore, PlatformServices,
    TickCallback, TimerHandle, TimerService,
};

use crate::{WebFileTransferService, WebPersistentStore, WebTimerService};

/// Returns the compile-time selected host strategy for the active build.
pub const fn selected_host_strategy() -> HostStrategy {
    #[cfg(feature = "host-stub")]
    {
        HostStrategy::Stub
    }

    #[cfg(not(feature = "host-stub"))]
    {
        HostStrategy::Browser
    }
}

/// Returns the selected host strategy as a stable string token.
pub fn host_strategy_name() -> &'static str {
    selected_host_strategy().as_str()
}

/// Adapter enum that erases the concrete storage backend behind [`PersistentStore`].
#[derive(Debug, Clone, Copy)]
pub enum PersistentStoreAdapter {
    /// Browser `localStorage`.
    Browser(WebPersistentStore),
    /// No-op fallback used when the host is intentionally stubbed.
    Stub(NoopPersistentStore),
}

impl PersistentStore for PersistentStoreAdapter {
    fn read_persistent(&self, key: &str) -> Result<String, NotFound> {
        match self {
            Self::Browser(store) => store.read_persistent(key),
            Self::Stub(store) => store.read_persistent(key),
        }
    }

    fn write_persistent(&self, key: &str, value: &str) {
        match self {
            Self::Browser(store) => store.write_persistent(key, value),
            Self::Stub(store) => store.write_persistent(key, value),
        }
    }

    fn remove_persistent(&self, key: &str) {
        match self {
            Self::Browser(store) => store.remove_persistent(key),
            Self::Stub(store) => store.remove_persistent(key),
        }
    }
}

/// Adapter enum that erases the concrete file backend behind [`FileTransferService`].
#[derive(Debug, Clone, Copy)]
pub enum FileTransferAdapter {
    /// DOM download anchors and file inputs.
    Browser(WebFileTransferService),
    /// No-op fallback used when the host is intentionally stubbed.
    Stub(NoopFileTransferService),
}

impl FileTransferService for FileTransferAdapter {
    fn download_as_file(&self, filename: &str, content: &str, mime_type: &str) {
        match self {
            Self::Browser(service) => service.download_as_file(filename, content, mime_type),
            Self::Stub(service) => service.download_as_file(filename, content, mime_type),
        }
    }

    fn pick_file_text(&self, accept: &str, on_loaded: FileTextCallback) {
        match self {
            Self::Browser(service) => service.pick_file_text(accept, on_loaded),
            Self::Stub(service) => service.pick_file_text(accept, on_loaded),
        }
    }
}

/// Adapter enum that erases the concrete timer backend behind [`TimerService`].
#[derive(Debug, Clone, Copy)]
pub enum TimerServiceAdapter {
    /// `window.setInterval`.
    Browser(WebTimerService),
    /// No-op fallback used when the host is intentionally stubbed.
    Stub(NoopTimerService),
}

impl TimerService for TimerServiceAdapter {
    fn repeat_every(&self, interval_ms: u32, on_tick: TickCallback) -> TimerHandle {
        match self {
            Self::Browser(service) => service.repeat_every(interval_ms, on_tick),
            Self::Stub(service) => service.repeat_every(interval_ms, on_tick),
        }
    }
}

/// Builds the storage adapter for the compile-time selected host strategy.
pub fn persistent_store() -> PersistentStoreAdapter {
    match selected_host_strategy() {
        HostStrategy::Browser => PersistentStoreAdapter::Browser(WebPersistentStore),
        HostStrategy::Memory | HostStrategy::Stub => {
            PersistentStoreAdapter::Stub(NoopPersistentStore)
        }
    }
}

/// Builds the file transfer adapter for the compile-time selected host strategy.
pub fn file_transfer_service() -> FileTransferAdapter {
    match selected_host_strategy() {
        HostStrategy::Browser => FileTransferAdapter::Browser(WebFileTransferService),
        HostStrategy::Memory | HostStrategy::Stub => {
            FileTransferAdapter::Stub(NoopFileTransferService)
        }
    }
}

/// Builds the timer adapter for the compile-time selected host strategy.
pub fn timer_service() -> TimerServiceAdapter {
    match selected_host_strategy() {
        HostStrategy::Browser => TimerServiceAdapter::Browser(WebTimerService),
        HostStrategy::Memory | HostStrategy::Stub => TimerServiceAdapter::Stub(NoopTimerService),
    }
}

/// Builds the full platform bundle for the compile-time selected host strategy.
pub fn build_platform_services() -> PlatformServices {
    PlatformServices {
        storage: Rc::new(persistent_store()),
        files: Rc::new(file_transfer_service()),
        timers: Rc::new(timer_service()),
        host_strategy: selected_host_strategy(),
    }
}
