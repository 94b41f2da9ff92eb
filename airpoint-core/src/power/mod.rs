//! Power management: inactivity watchdog and battery status

pub mod battery;
pub mod watchdog;

pub use battery::{BatteryStatus, LOW_BATTERY_PERCENT};
pub use watchdog::WatchdogTimer;
