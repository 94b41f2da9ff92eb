//! Shared battery status

use crate::traits::{BatteryError, BatteryReading};

/// Charge below which the low-battery flag is raised
pub const LOW_BATTERY_PERCENT: u8 = 10;

/// Last battery measurement, written only by the battery task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BatteryStatus {
    reading: Option<BatteryReading>,
    last_error: Option<BatteryError>,
    samples: u32,
}

impl BatteryStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent successful reading
    pub fn reading(&self) -> Option<BatteryReading> {
        self.reading
    }

    /// Error from the most recent attempt, if it failed
    pub fn last_error(&self) -> Option<BatteryError> {
        self.last_error
    }

    /// Successful readings so far
    pub fn samples(&self) -> u32 {
        self.samples
    }

    pub fn percent(&self) -> Option<u8> {
        self.reading.map(|r| r.percent)
    }

    /// Check if the last reading is below [`LOW_BATTERY_PERCENT`]
    pub fn is_low(&self) -> bool {
        self.percent().is_some_and(|p| p < LOW_BATTERY_PERCENT)
    }

    pub(crate) fn record(&mut self, result: Result<BatteryReading, BatteryError>) {
        match result {
            Ok(reading) => {
                self.reading = Some(reading);
                self.last_error = None;
                self.samples = self.samples.saturating_add(1);
            }
            // Keep the previous reading
            Err(e) => self.last_error = Some(e),
        }
    }
}
