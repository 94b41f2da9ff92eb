//! Periodic battery measurement

use crate::config::Tunables;
use crate::signals::Flag;
use crate::timing::CadenceTimer;

use super::{Context, Step, Task};

/// Reads the gauge every `battery.interval_ms`
#[derive(Debug, Clone, Default)]
pub struct BatteryTask {
    cadence: Option<CadenceTimer>,
}

impl BatteryTask {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Task for BatteryTask {
    fn name(&self) -> &'static str {
        "battery"
    }

    fn poll(&mut self, cx: &mut Context<'_, '_>) -> Step {
        let now = cx.now_ms;
        let interval = Tunables::from_store(&cx.shared.store).battery_interval_ms;

        let cadence = self
            .cadence
            .get_or_insert_with(|| CadenceTimer::new(interval, now));
        if cadence.period_ms() != interval {
            cadence.set_period(interval, now);
        }
        if !cadence.is_ready(now) {
            return Step::Sleep(cadence.time_until_next(now) as u32);
        }

        let result = cx.io.battery.read();
        #[cfg(feature = "defmt")]
        match &result {
            Ok(r) => defmt::debug!("battery {}mV {}%", r.millivolts, r.percent),
            Err(e) => defmt::warn!("battery read failed: {}", e),
        }

        cx.shared.battery.record(result);
        let low = cx.shared.battery.is_low();
        cx.shared.flags.assign(Flag::BatteryLow, low);

        Step::Sleep(cadence.time_until_next(now) as u32)
    }
}
