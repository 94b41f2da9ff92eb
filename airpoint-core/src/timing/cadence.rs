//! Fixed-period tick scheduling
//!
//! Deadlines are `t0 + n * period` on a monotonic millisecond clock. A caller
//! that falls a full period or more behind skips the missed ticks instead of
//! firing a burst of catch-up ticks.

/// Drift-correcting periodic timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CadenceTimer {
    start_ms: u64,
    period_ms: u64,
    ticks: u64,
}

impl CadenceTimer {
    /// Create a timer whose first tick is due at `start_ms`
    pub fn new(period_ms: u32, start_ms: u64) -> Self {
        Self {
            start_ms,
            period_ms: period_ms.max(1) as u64,
            ticks: 0,
        }
    }

    /// Period in milliseconds
    pub fn period_ms(&self) -> u32 {
        self.period_ms as u32
    }

    /// Absolute time of the next tick
    pub fn next_deadline(&self) -> u64 {
        self.start_ms + self.ticks * self.period_ms
    }

    /// Check whether a tick is due, consuming it if so
    ///
    /// Fires at most once per call, and never twice for the same `now_ms`.
    pub fn is_ready(&mut self, now_ms: u64) -> bool {
        let behind = now_ms.saturating_sub(self.next_deadline());
        // Skip whole missed periods
        self.ticks += behind / self.period_ms;
        if now_ms >= self.next_deadline() {
            self.ticks += 1;
            return true;
        }
        false
    }

    /// Milliseconds until the next tick (zero if already due)
    pub fn time_until_next(&self, now_ms: u64) -> u64 {
        self.next_deadline().saturating_sub(now_ms)
    }

    /// Change the period, restarting the count at `now_ms`
    pub fn set_period(&mut self, period_ms: u32, now_ms: u64) {
        self.period_ms = period_ms.max(1) as u64;
        self.start_ms = now_ms;
        self.ticks = 0;
    }
}
