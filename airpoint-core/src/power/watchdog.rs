//! Inactivity watchdog
//!
//! Counts whole seconds without activity. Expiry raises a sleep request; it
//! never interrupts anything by itself.

/// Inactivity timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WatchdogTimer {
    elapsed_s: u32,
    threshold_s: u32,
    fired: bool,
}

impl WatchdogTimer {
    pub fn new(threshold_s: u32) -> Self {
        Self {
            elapsed_s: 0,
            threshold_s,
            fired: false,
        }
    }

    /// Seconds since the last feed
    pub fn elapsed_s(&self) -> u32 {
        self.elapsed_s
    }

    pub fn threshold_s(&self) -> u32 {
        self.threshold_s
    }

    /// Record activity
    pub fn feed(&mut self) {
        self.elapsed_s = 0;
        self.fired = false;
    }

    /// Advance by `seconds`
    ///
    /// Returns true only on the tick where elapsed first reaches the threshold.
    pub fn tick(&mut self, seconds: u32) -> bool {
        self.elapsed_s = self.elapsed_s.saturating_add(seconds);
        if !self.is_expired() {
            self.fired = false;
            return false;
        }
        if self.fired {
            return false;
        }
        self.fired = true;
        true
    }

    /// Change the threshold without touching elapsed time
    pub fn set_threshold(&mut self, threshold_s: u32) {
        self.threshold_s = threshold_s;
    }

    pub fn is_expired(&self) -> bool {
        self.elapsed_s >= self.threshold_s
    }
}
