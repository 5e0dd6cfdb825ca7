//! Bootstrap sequencing and the outbound save loop.

use std::rc::Rc;

use futures::{channel::mpsc, StreamExt};
use leptos::logging;
use platform_host::{
    write_persistent_json, Clock, PersistentStore, PlatformServices, SystemClock,
};
use thiserror::Error;

use crate::config::BootConfig;
use crate::messages::{MessageOutcome, OutboundMessage};
use crate::migration::{resolve_document, BootSource, ResolvedDocument};
use crate::model::{BootFlags, PersistedDocument};

/// Sending half of the application's outbound channel.
pub type OutboundSender = mpsc::UnboundedSender<OutboundMessage>;

#[derive(Debug, Error)]
/// Failures while handling an outbound message.
pub enum PersistError {
    /// The save payload could not be serialized.
    #[error("failed to serialize save payload: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Everything the application receives when it is started.
#[derive(Clone)]
pub struct ConsumerContext {
    /// Initial document and startup time.
    pub flags: BootFlags,
    /// The application's single outbound channel.
    pub outbound: OutboundSender,
    /// Platform capabilities for export/import and timers.
    pub platform: PlatformServices,
    /// Clock used for startup time and ticks.
    pub clock: Rc<dyn Clock>,
    /// Active configuration.
    pub config: BootConfig,
}

/// The checklist application, reached only through [`ConsumerContext`].
pub trait ChecklistConsumer {
    /// Starts the application. Called exactly once per boot.
    fn start(&mut self, context: ConsumerContext);
}

impl<F> ChecklistConsumer for F
where
    F: FnMut(ConsumerContext),
{
    fn start(&mut self, context: ConsumerContext) {
        self(context);
    }
}

/// Runs the one-shot startup sequence against injected platform services.
pub struct BootSequencer {
    platform: PlatformServices,
    config: BootConfig,
    clock: Rc<dyn Clock>,
}

impl BootSequencer {
    /// Creates a sequencer using the system clock.
    pub fn new(platform: PlatformServices, config: BootConfig) -> Self {
        Self {
            platform,
            config,
            clock: Rc::new(SystemClock),
        }
    }

    /// Replaces the clock used for the startup timestamp.
    pub fn with_clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Resolves the initial document without starting anything.
    pub fn resolve(&self) -> ResolvedDocument {
        resolve_document(self.platform.storage.as_ref(), &self.config)
    }

    /// Resolves the initial document, starts `consumer`, and returns the runtime that services
    /// its outbound channel.
    pub fn boot<C: ChecklistConsumer + ?Sized>(self, consumer: &mut C) -> ChecklistRuntime {
        let resolved = self.resolve();
        logging::log!(
            "loaded {} checklists from {} tier on {} host",
            resolved.document.checklists.len(),
            resolved.source.as_str(),
            self.platform.host_strategy.as_str()
        );

        let flags = BootFlags {
            data: resolved.document.clone(),
            time: self.clock.now_ms(),
        };
        let (outbound, receiver) = mpsc::unbounded();
        consumer.start(ConsumerContext {
            flags,
            outbound,
            platform: self.platform.clone(),
            clock: self.clock.clone(),
            config: self.config.clone(),
        });

        ChecklistRuntime {
            initial: resolved,
            receiver,
            storage: self.platform.storage,
            data_key: self.config.data_key,
        }
    }
}

/// Post-boot runtime that persists save messages from the application.
pub struct ChecklistRuntime {
    initial: ResolvedDocument,
    receiver: mpsc::UnboundedReceiver<OutboundMessage>,
    storage: Rc<dyn PersistentStore>,
    data_key: String,
}

impl ChecklistRuntime {
    /// Document handed to the application at startup.
    pub fn initial_document(&self) -> &PersistedDocument {
        &self.initial.document
    }

    /// Tier that produced the initial document.
    pub fn source(&self) -> BootSource {
        self.initial.source
    }

    /// Applies one outbound message.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] when a save payload cannot be serialized.
    pub fn handle_message(&self, message: OutboundMessage) -> Result<MessageOutcome, PersistError> {
        match message {
            OutboundMessage::Save { data } => {
                let bytes = write_persistent_json(self.storage.as_ref(), &self.data_key, &data)?;
                logging::log!("saved {bytes} bytes to `{}`", self.data_key);
                Ok(MessageOutcome::Saved {
                    key: self.data_key.clone(),
                    bytes,
                })
            }
            OutboundMessage::Unrecognized { kind } => {
                logging::log!("unrecognised message: {kind}");
                Ok(MessageOutcome::Ignored { kind })
            }
        }
    }

    fn dispatch(&self, message: OutboundMessage) {
        let kind = message.kind().to_string();
        if let Err(err) = self.handle_message(message) {
            logging::warn!("outbound `{kind}` message dropped: {err}");
        }
    }

    /// Handles every message already queued, without waiting. Returns how many were handled.
    pub fn drain_pending(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(Some(message)) = self.receiver.try_next() {
            self.dispatch(message);
            handled += 1;
        }
        handled
    }

    /// Services the outbound channel until every sender is dropped.
    pub async fn run(mut self) {
        while let Some(message) = self.receiver.next().await {
            self.dispatch(message);
        }
        logging::log!("outbound channel closed");
    }
}
