//! Battery gauge trait

/// Errors that can occur reading the battery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BatteryError {
    /// ADC conversion failed
    ConversionError,
    /// Reading outside any plausible pack voltage
    OutOfRange,
}

/// One battery measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BatteryReading {
    /// Pack voltage in millivolts
    pub millivolts: u16,
    /// Estimated state of charge, 0-100
    pub percent: u8,
}

/// Trait for battery gauges
pub trait BatterySensor {
    fn read(&mut self) -> Result<BatteryReading, BatteryError>;
}
