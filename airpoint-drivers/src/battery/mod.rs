//! Battery gauges

pub mod lipo;

pub use lipo::{AdcReader, BatteryGauge};
