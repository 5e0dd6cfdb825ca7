//! Repeating timer contracts and a manually driven adapter for tests.

use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::Rc,
};

/// Callback invoked on every timer tick.
pub type TickCallback = Box<dyn FnMut() + 'static>;

/// Host service that schedules repeating callbacks.
pub trait TimerService {
    /// Invokes `on_tick` every `interval_ms` milliseconds until the returned handle is cancelled.
    fn repeat_every(&self, interval_ms: u32, on_tick: TickCallback) -> TimerHandle;
}

/// Backend cancel action. Dropped unused, it is leaked with the timer it controls.
struct Canceller(Option<Box<dyn FnOnce()>>);

impl Drop for Canceller {
    fn drop(&mut self) {
        if let Some(cancel) = self.0.take() {
            std::mem::forget(cancel);
        }
    }
}

/// Cancellation capability for a running timer.
///
/// Dropping every clone detaches the timer: it keeps running, and the backend state captured by
/// the cancel action stays alive with it. Clones refer to the same timer.
#[derive(Clone)]
pub struct TimerHandle {
    canceller: Rc<RefCell<Canceller>>,
    cancelled: Rc<Cell<bool>>,
}

impl TimerHandle {
    /// Wraps a backend-specific cancel action.
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            canceller: Rc::new(RefCell::new(Canceller(Some(Box::new(cancel))))),
            cancelled: Rc::new(Cell::new(false)),
        }
    }

    /// Handle for a timer that never runs.
    pub fn inert() -> Self {
        Self::new(|| {})
    }

    /// Stops the timer. Calling this more than once has no further effect.
    pub fn cancel(&self) {
        self.cancelled.set(true);
        let cancel = self.canceller.borrow_mut().0.take();
        if let Some(cancel) = cancel {
            cancel();
        }
    }

    /// Returns whether [`TimerHandle::cancel`] has been called.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

impl fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerHandle")
            .field("cancelled", &self.cancelled.get())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Timer service for unsupported targets. Callbacks never fire.
pub struct NoopTimerService;

impl TimerService for NoopTimerService {
    fn repeat_every(&self, _interval_ms: u32, _on_tick: TickCallback) -> TimerHandle {
        TimerHandle::inert()
    }
}

struct ManualTimer {
    interval_ms: u64,
    next_due_ms: u64,
    active: Rc<Cell<bool>>,
    on_tick: Option<TickCallback>,
}

#[derive(Default)]
struct ManualTimerState {
    now_ms: u64,
    timers: Vec<ManualTimer>,
}

#[derive(Clone, Default)]
/// Timer service driven by [`ManualTimerService::advance`] instead of wall-clock time.
pub struct ManualTimerService {
    inner: Rc<RefCell<ManualTimerState>>,
}

impl ManualTimerService {
    /// Moves virtual time forward and fires every tick that falls due, in schedule order per timer.
    ///
    /// Returns the number of callbacks invoked.
    pub fn advance(&self, delta_ms: u64) -> usize {
        let now = {
            let mut inner = self.inner.borrow_mut();
            inner.now_ms = inner.now_ms.saturating_add(delta_ms);
            inner.now_ms
        };

        let mut fired = 0;
        let mut index = 0;
        loop {
            let due = {
                let mut inner = self.inner.borrow_mut();
                let Some(timer) = inner.timers.get_mut(index) else {
                    break;
                };
                if timer.active.get() && timer.next_due_ms <= now {
                    timer.next_due_ms = timer.next_due_ms.saturating_add(timer.interval_ms);
                    timer.on_tick.take()
                } else {
                    index += 1;
                    None
                }
            };

            if let Some(mut on_tick) = due {
                on_tick();
                fired += 1;
                if let Some(timer) = self.inner.borrow_mut().timers.get_mut(index) {
                    timer.on_tick = Some(on_tick);
                }
            }
        }
        fired
    }

    /// Returns how many timers are still running.
    pub fn active_count(&self) -> usize {
        self.inner
            .borrow()
            .timers
            .iter()
            .filter(|timer| timer.active.get())
            .count()
    }
}

impl fmt::Debug for ManualTimerService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ManualTimerService")
            .field("now_ms", &inner.now_ms)
            .field("timers", &inner.timers.len())
            .finish()
    }
}

impl TimerService for ManualTimerService {
    fn repeat_every(&self, interval_ms: u32, on_tick: TickCallback) -> TimerHandle {
        // Zero intervals are clamped the way browsers clamp `setInterval`.
        let interval_ms = u64::from(interval_ms.max(1));
        let active = Rc::new(Cell::new(true));
        {
            let mut inner = self.inner.borrow_mut();
            let next_due_ms = inner.now_ms.saturating_add(interval_ms);
            inner.timers.push(ManualTimer {
                interval_ms,
                next_due_ms,
                active: active.clone(),
                on_tick: Some(on_tick),
            });
        }
        TimerHandle::new(move || active.set(false))
    }
}
