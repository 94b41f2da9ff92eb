//! Single-cell LiPo gauge
//!
//! Pack voltage is read through a resistor divider on an ADC pin and mapped
//! to state of charge with a resting-voltage lookup table.

use airpoint_core::traits::{BatteryError, BatteryReading, BatterySensor};

/// Resting cell voltage to charge
///
/// Table format: (millivolts, percent), sorted by decreasing voltage.
/// Typical 1S LiPo discharge curve at low load.
const CHARGE_TABLE: &[(u16, u8)] = &[
    (4200, 100),
    (4150, 95),
    (4110, 90),
    (4080, 85),
    (4020, 80),
    (3980, 75),
    (3950, 70),
    (3910, 65),
    (3870, 60),
    (3850, 55),
    (3840, 50),
    (3820, 45),
    (3800, 40),
    (3790, 35),
    (3770, 30),
    (3750, 25),
    (3730, 20),
    (3710, 15),
    (3690, 10),
    (3610, 5),
    (3270, 0),
];

/// Below this the divider reads an absent or shorted pack
const MIN_PLAUSIBLE_MV: u16 = 2500;
/// Above this the divider or reference is wrong
const MAX_PLAUSIBLE_MV: u16 = 4500;

/// ADC reading trait for platform abstraction
pub trait AdcReader {
    /// Read ADC value (12-bit, 0-4095)
    #[allow(clippy::result_unit_err)]
    fn read(&mut self) -> Result<u16, ()>;
}

/// LiPo cell behind a resistor divider
pub struct BatteryGauge<ADC> {
    adc: ADC,
    /// ADC reference voltage in mV
    vref_mv: u16,
    /// Divider resistor from the pack to the pin
    r_top_ohms: u32,
    /// Divider resistor from the pin to ground
    r_bottom_ohms: u32,
    /// ADC resolution (4096 for 12-bit)
    adc_max: u16,
}

impl<ADC> BatteryGauge<ADC> {
    /// Create a gauge
    ///
    /// # Arguments
    /// - `adc`: ADC channel on the divider midpoint
    /// - `vref_mv`: Reference voltage in millivolts (typically 3300)
    /// - `r_top_ohms`, `r_bottom_ohms`: divider resistors
    pub fn new(adc: ADC, vref_mv: u16, r_top_ohms: u32, r_bottom_ohms: u32) -> Self {
        Self {
            adc,
            vref_mv,
            r_top_ohms,
            r_bottom_ohms: r_bottom_ohms.max(1),
            adc_max: 4096,
        }
    }

    /// Convert ADC counts to pack millivolts
    ///
    /// V_pack = counts * vref / adc_max * (r_top + r_bottom) / r_bottom
    pub fn counts_to_millivolts(&self, counts: u16) -> u16 {
        let pin_mv = counts as u64 * self.vref_mv as u64 / self.adc_max as u64;
        let pack_mv =
            pin_mv * (self.r_top_ohms as u64 + self.r_bottom_ohms as u64) / self.r_bottom_ohms as u64;
        pack_mv.min(u16::MAX as u64) as u16
    }

    /// Estimate charge from pack voltage
    ///
    /// Clamps to 0 and 100 outside the table and interpolates linearly
    /// between entries.
    pub fn millivolts_to_percent(millivolts: u16) -> u8 {
        let (top_mv, top_pct) = CHARGE_TABLE[0];
        if millivolts >= top_mv {
            return top_pct;
        }
        let (bottom_mv, bottom_pct) = CHARGE_TABLE[CHARGE_TABLE.len() - 1];
        if millivolts <= bottom_mv {
            return bottom_pct;
        }

        for pair in CHARGE_TABLE.windows(2) {
            let (mv_high, pct_high) = pair[0];
            let (mv_low, pct_low) = pair[1];

            if millivolts <= mv_high && millivolts >= mv_low {
                let mv_range = (mv_high - mv_low) as u32;
                let pct_range = (pct_high - pct_low) as u32;
                let mv_offset = (millivolts - mv_low) as u32;
                return pct_low + (pct_range * mv_offset / mv_range) as u8;
            }
        }

        bottom_pct
    }
}

impl<ADC: AdcReader> BatterySensor for BatteryGauge<ADC> {
    fn read(&mut self) -> Result<BatteryReading, BatteryError> {
        let counts = self.adc.read().map_err(|_| BatteryError::ConversionError)?;
        let millivolts = self.counts_to_millivolts(counts);

        if !(MIN_PLAUSIBLE_MV..=MAX_PLAUSIBLE_MV).contains(&millivolts) {
            return Err(BatteryError::OutOfRange);
        }

        Ok(BatteryReading {
            millivolts,
            percent: Self::millivolts_to_percent(millivolts),
        })
    }
}

#[cfg(test)]
struct DummyAdc(Result<u16, ()>);

#[cfg(test)]
impl AdcReader for DummyAdc {
    fn read(&mut self) -> Result<u16, ()> {
        self.0
    }
}
