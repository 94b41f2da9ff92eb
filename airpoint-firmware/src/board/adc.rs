//! Battery ADC channel
//!
//! VSYS reaches GPIO29 (ADC3) through a 200k/100k divider on Pico-class
//! boards.

use embassy_rp::adc::{Adc, Blocking, Channel};

use airpoint_drivers::battery::AdcReader;

/// Top resistor of the VSYS divider
pub const VSYS_R_TOP_OHMS: u32 = 200_000;
/// Bottom resistor of the VSYS divider
pub const VSYS_R_BOTTOM_OHMS: u32 = 100_000;
/// ADC reference in millivolts
pub const ADC_VREF_MV: u16 = 3300;

/// One ADC channel read in blocking mode
pub struct RpAdc {
    adc: Adc<'static, Blocking>,
    channel: Channel<'static>,
}

impl RpAdc {
    pub fn new(adc: Adc<'static, Blocking>, channel: Channel<'static>) -> Self {
        Self { adc, channel }
    }
}

impl AdcReader for RpAdc {
    fn read(&mut self) -> Result<u16, ()> {
        self.adc.blocking_read(&mut self.channel).map_err(|_| ())
    }
}
