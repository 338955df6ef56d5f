//! Debounce and throttle helpers built on host timers.
//!
//! Neither type owns a callback. They only manage the pending timer; the
//! controller that owns one reacts to its [`TimerKey`] when it fires.

use crate::events::TimerKey;
use crate::host::{Host, TimerHandle};

/// Runs an action once a quiet window of `wait_ms` passes with no new trigger.
#[derive(Debug, Clone)]
pub struct Debouncer {
    wait_ms: u32,
    key: TimerKey,
    pending: Option<TimerHandle>,
}

impl Debouncer {
    pub fn new(wait_ms: u32, key: TimerKey) -> Self {
        Self {
            wait_ms,
            key,
            pending: None,
        }
    }

    /// Restart the quiet window. The previous pending timer, if any, is cleared.
    pub fn schedule<H: Host + ?Sized>(&mut self, host: &mut H) {
        self.cancel(host);
        self.pending = Some(host.set_timeout(self.wait_ms, self.key));
    }

    pub fn cancel<H: Host + ?Sized>(&mut self, host: &mut H) {
        if let Some(handle) = self.pending.take() {
            host.clear_timer(handle);
        }
    }

    /// Called when `key` fires. Returns true if it belongs to this debouncer
    /// and the window was still pending.
    pub fn settle(&mut self, key: TimerKey) -> bool {
        key == self.key && self.pending.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Throttle with a leading and a trailing edge: at most one pass per
/// `limit_ms`, plus one catch-up pass when the window closes if calls were
/// dropped inside it.
#[derive(Debug, Clone)]
pub struct Throttle {
    limit_ms: u32,
    key: TimerKey,
    closed: bool,
    dropped: bool,
}

impl Throttle {
    pub fn new(limit_ms: u32, key: TimerKey) -> Self {
        Self {
            limit_ms,
            key,
            closed: false,
            dropped: false,
        }
    }

    /// Returns true when the caller may run now; the throttle then stays
    /// closed until its timer reopens it. A refused call is remembered.
    pub fn try_pass<H: Host + ?Sized>(&mut self, host: &mut H) -> bool {
        if self.closed {
            self.dropped = true;
            return false;
        }
        self.closed = true;
        host.set_timeout(self.limit_ms, self.key);
        true
    }

    /// Reopen on the throttle's own timer. `None` if `key` is not ours,
    /// otherwise whether a call was dropped while closed and the caller
    /// owes a trailing run.
    pub fn reopen(&mut self, key: TimerKey) -> Option<bool> {
        if key != self.key {
            return None;
        }
        self.closed = false;
        Some(std::mem::take(&mut self.dropped))
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}
