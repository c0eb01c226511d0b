//! Debounce: collapse bursts of triggers into one invocation
//!
//! Two flavours with the same semantics:
//!
//! - [`Debouncer`] is clock-driven. The caller passes timestamps in
//!   milliseconds, which keeps replayed event logs deterministic.
//! - [`Debounced`] wraps a callback and runs on tokio timers.
//!
//! Every trigger restarts the `wait` window. With `immediate` the first
//! trigger of a burst fires at once and the rest are swallowed until the
//! window closes. Without it, nothing fires during the burst and the last
//! trigger fires once the window closes.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::config::DebounceConfig;

/// Default window of the site's debounce helper.
pub const DEFAULT_WAIT: Duration = Duration::from_millis(20);

/// Clock-driven debouncer holding the latest pending value.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    wait_ms: u64,
    immediate: bool,
    /// When the current window closes, if one is open.
    deadline: Option<u64>,
    /// Value waiting for the trailing edge (only without `immediate`).
    pending: Option<T>,
}

impl<T> Debouncer<T> {
    pub fn new(wait: Duration, immediate: bool) -> Self {
        Self {
            wait_ms: wait.as_millis() as u64,
            immediate,
            deadline: None,
            pending: None,
        }
    }

    pub fn from_config(config: &DebounceConfig) -> Self {
        Self::new(config.wait(), config.immediate)
    }

    /// Register a trigger at `now_ms`.
    ///
    /// Returns the value if it should be handled right away (leading
    /// edge). Call [`poll`](Self::poll) first so a trailing value from an
    /// earlier burst is not overwritten.
    pub fn trigger(&mut self, now_ms: u64, value: T) -> Option<T> {
        let window_open = self.deadline.is_some_and(|deadline| now_ms < deadline);
        self.deadline = Some(now_ms.saturating_add(self.wait_ms));

        if self.immediate {
            (!window_open).then_some(value)
        } else {
            self.pending = Some(value);
            None
        }
    }

    /// Close the window if it has elapsed by `now_ms`.
    ///
    /// Returns the trailing value when one is due.
    pub fn poll(&mut self, now_ms: u64) -> Option<T> {
        match self.deadline {
            Some(deadline) if now_ms >= deadline => {
                self.deadline = None;
                self.pending.take()
            }
            _ => None,
        }
    }

    /// Close the window now, whatever the clock says.
    ///
    /// Returns the trailing value if one was pending.
    pub fn flush(&mut self) -> Option<T> {
        self.deadline = None;
        self.pending.take()
    }

    /// Whether a window is currently open at `now_ms`.
    pub fn is_waiting(&self, now_ms: u64) -> bool {
        self.deadline.is_some_and(|deadline| now_ms < deadline)
    }

    /// When the open window closes, if any.
    pub fn deadline(&self) -> Option<u64> {
        self.deadline
    }
}

type Callback<A> = Arc<dyn Fn(A) + Send + Sync>;

#[derive(Default)]
struct TimerSlot {
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

/// Callback wrapper debounced on tokio time.
///
/// Cloning shares the same window.
pub struct Debounced<A> {
    callback: Callback<A>,
    wait: Duration,
    immediate: bool,
    slot: Arc<Mutex<TimerSlot>>,
}

impl<A> Clone for Debounced<A> {
    fn clone(&self) -> Self {
        Self {
            callback: Arc::clone(&self.callback),
            wait: self.wait,
            immediate: self.immediate,
            slot: Arc::clone(&self.slot),
        }
    }
}

fn lock(slot: &Mutex<TimerSlot>) -> MutexGuard<'_, TimerSlot> {
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl<A: Send + 'static> Debounced<A> {
    pub fn new<F>(callback: F, wait: Duration, immediate: bool) -> Self
    where
        F: Fn(A) + Send + Sync + 'static,
    {
        Self {
            callback: Arc::new(callback),
            wait,
            immediate,
            slot: Arc::new(Mutex::new(TimerSlot::default())),
        }
    }

    /// Trigger the wrapped callback.
    ///
    /// Must be called inside a tokio runtime. With `immediate` the callback
    /// may run synchronously before this returns.
    pub fn call(&self, arg: A) {
        let deadline = Instant::now() + self.wait;
        let mut slot = lock(&self.slot);

        let call_now = self.immediate && slot.handle.is_none();
        if let Some(previous) = slot.handle.take() {
            previous.abort();
        }
        slot.generation += 1;
        let generation = slot.generation;

        let (now_arg, later_arg) = if self.immediate {
            (Some(arg), None)
        } else {
            (None, Some(arg))
        };

        let shared = Arc::clone(&self.slot);
        let callback = Arc::clone(&self.callback);
        slot.handle = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            {
                let mut slot = lock(&shared);
                if slot.generation != generation {
                    return;
                }
                slot.handle = None;
            }
            if let Some(arg) = later_arg {
                callback(arg);
            }
        }));
        drop(slot);

        if call_now {
            if let Some(arg) = now_arg {
                (self.callback)(arg);
            }
        }
    }

    /// Whether a window is open (a timer is pending).
    pub fn is_waiting(&self) -> bool {
        lock(&self.slot).handle.is_some()
    }
}
