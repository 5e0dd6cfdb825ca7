//! Platform service bundle injected into the checklist runtime.

use std::rc::Rc;

use crate::{
    FileTransferService, ManualTimerService, MemoryFileTransferService, MemoryPersistentStore,
    NoopFileTransferService, NoopPersistentStore, NoopTimerService, PersistentStore, TimerService,
};

/// Stable host strategy selected for the current build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostStrategy {
    /// Browser-backed composition (`localStorage`, DOM file dialogs, `setInterval`).
    Browser,
    /// In-memory composition used for headless runs and tests.
    Memory,
    /// Placeholder composition where every capability is a no-op.
    Stub,
}

impl HostStrategy {
    /// Returns a stable string token for diagnostics.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Browser => "browser",
            Self::Memory => "memory",
            Self::Stub => "stub",
        }
    }
}

/// Runtime-selected platform capability bundle.
///
/// Environment-specific adapter selection happens before this bundle reaches the runtime, which
/// keeps the bootstrap sequence independent of browser APIs.
#[derive(Clone)]
pub struct PlatformServices {
    /// Persistent key/value storage.
    pub storage: Rc<dyn PersistentStore>,
    /// Text file download and upload.
    pub files: Rc<dyn FileTransferService>,
    /// Repeating timers.
    pub timers: Rc<dyn TimerService>,
    /// Strategy identifier for diagnostics.
    pub host_strategy: HostStrategy,
}

impl PlatformServices {
    /// Bundle where every capability is a no-op.
    pub fn stub() -> Self {
        Self {
            storage: Rc::new(NoopPersistentStore),
            files: Rc::new(NoopFileTransferService),
            timers: Rc::new(NoopTimerService),
            host_strategy: HostStrategy::Stub,
        }
    }

    /// Bundle backed by the given in-memory adapters.
    ///
    /// Callers keep their own clones of the adapters to inspect or drive them.
    pub fn memory(
        storage: MemoryPersistentStore,
        files: MemoryFileTransferService,
        timers: ManualTimerService,
    ) -> Self {
        Self {
            storage: Rc::new(storage),
            files: Rc::new(files),
            timers: Rc::new(timers),
            host_strategy: HostStrategy::Memory,
        }
    }
}

impl std::fmt::Debug for PlatformServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformServices")
            .field("host_strategy", &self.host_strategy)
            .finish_non_exhaustive()
    }
}
