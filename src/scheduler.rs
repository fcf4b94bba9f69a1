//! Polling scheduler.
//!
//! Owns at most one repeating timer. The timer is driven by the caller's
//! event loop: [`PollingScheduler::poll`] is called with the current instant
//! and reports whether a tick is due, and [`PollingScheduler::time_until_next`]
//! tells the loop how long it may block waiting for input.
//!
//! Any change to enablement or interval cancels the active timer before a
//! new one is (optionally) started, so two timers can never coexist.

use std::time::{Duration, Instant};
use tracing::debug;

/// Intervals offered by the interval selector, in milliseconds.
pub const INTERVAL_CHOICES_MS: [u64; 4] = [1000, 3000, 5000, 10000];

/// Default polling interval in milliseconds.
pub const DEFAULT_INTERVAL_MS: u64 = 3000;

/// Who asked for a refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshKind {
    /// Explicit user action: shows the loading placeholder and surfaces errors.
    Loud,
    /// Timer tick: no loading placeholder, errors are swallowed.
    Quiet,
}

impl RefreshKind {
    pub fn is_loud(&self) -> bool {
        matches!(self, RefreshKind::Loud)
    }
}

#[derive(Debug, Clone, Copy)]
struct ActiveTimer {
    id: u64,
    next_due: Instant,
}

#[derive(Debug)]
pub struct PollingScheduler {
    enabled: bool,
    interval: Duration,
    timer: Option<ActiveTimer>,
    /// Number of timers ever started; doubles as the id source.
    started: u64,
}

impl PollingScheduler {
    /// Create a scheduler. No timer runs until [`start`](Self::start).
    pub fn new(enabled: bool, interval: Duration) -> Self {
        Self {
            enabled,
            interval,
            timer: None,
            started: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether a timer is currently armed.
    pub fn is_active(&self) -> bool {
        self.timer.is_some()
    }

    /// Id of the armed timer, if any. Ids are never reused.
    pub fn active_timer_id(&self) -> Option<u64> {
        self.timer.map(|t| t.id)
    }

    /// Arm the timer according to the current settings.
    pub fn start(&mut self, now: Instant) {
        self.restart(now);
    }

    pub fn set_auto_refresh(&mut self, enabled: bool, now: Instant) {
        self.enabled = enabled;
        self.restart(now);
    }

    pub fn set_interval(&mut self, interval: Duration, now: Instant) {
        self.interval = interval;
        self.restart(now);
    }

    /// Cancel the active timer, if any.
    pub fn cancel(&mut self) {
        if let Some(timer) = self.timer.take() {
            debug!(timer = timer.id, "polling timer cancelled");
        }
    }

    fn restart(&mut self, now: Instant) {
        self.cancel();
        if !self.enabled || self.interval.is_zero() {
            return;
        }
        self.started += 1;
        self.timer = Some(ActiveTimer {
            id: self.started,
            next_due: now + self.interval,
        });
        debug!(
            timer = self.started,
            interval_ms = self.interval.as_millis() as u64,
            "polling timer started"
        );
    }

    /// Returns `true` when a tick is due and re-arms the timer for the next
    /// period. Missed periods are collapsed into a single tick.
    pub fn poll(&mut self, now: Instant) -> bool {
        let interval = self.interval;
        match self.timer.as_mut() {
            Some(timer) if now >= timer.next_due => {
                timer.next_due += interval;
                if timer.next_due <= now {
                    timer.next_due = now + interval;
                }
                true
            }
            _ => false,
        }
    }

    /// Time until the next tick, or `None` when no timer is armed.
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        self.timer
            .map(|t| t.next_due.saturating_duration_since(now))
    }
}

/// The interval choice following `current`, wrapping around. Intervals that
/// are not one of the choices move to the first choice above them.
pub fn next_interval(current: Duration) -> Duration {
    let ms = current.as_millis() as u64;
    let next = INTERVAL_CHOICES_MS
        .iter()
        .copied()
        .find(|&choice| choice > ms)
        .unwrap_or(INTERVAL_CHOICES_MS[0]);
    Duration::from_millis(next)
}
