//! Periodic clock ticks delivered to the application.

use std::rc::Rc;

use futures::channel::mpsc;
use platform_host::{Clock, TimerHandle, TimerService};

use crate::messages::InboundMessage;

/// Receiving half of the application's inbound channel.
pub type InboundReceiver = mpsc::UnboundedReceiver<InboundMessage>;

/// Starts a repeating timer that pushes [`InboundMessage::Tick`] into `sink`.
///
/// Ticks sent after the receiver is dropped are discarded. The timer keeps running until the
/// returned handle is cancelled.
pub fn start_clock(
    timers: &dyn TimerService,
    clock: Rc<dyn Clock>,
    interval_ms: u32,
    sink: mpsc::UnboundedSender<InboundMessage>,
) -> TimerHandle {
    timers.repeat_every(
        interval_ms,
        Box::new(move || {
            let _ = sink.unbounded_send(InboundMessage::Tick {
                time: clock.now_ms(),
            });
        }),
    )
}
