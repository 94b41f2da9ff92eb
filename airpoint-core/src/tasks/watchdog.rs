//! Inactivity watchdog task
//!
//! Once a second: consume [`Flag::Activity`] to feed the timer, otherwise
//! advance it. Expiry raises [`Flag::SleepRequested`].

use crate::config::Tunables;
use crate::power::WatchdogTimer;
use crate::signals::Flag;
use crate::timing::CadenceTimer;

use super::{Context, Step, Task};

const TICK_MS: u32 = 1000;

#[derive(Debug, Clone, Default)]
pub struct WatchdogTask {
    cadence: Option<CadenceTimer>,
    timer: Option<WatchdogTimer>,
}

impl WatchdogTask {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timer(&self) -> Option<&WatchdogTimer> {
        self.timer.as_ref()
    }
}

impl Task for WatchdogTask {
    fn name(&self) -> &'static str {
        "watchdog"
    }

    fn poll(&mut self, cx: &mut Context<'_, '_>) -> Step {
        let now = cx.now_ms;
        let threshold = Tunables::from_store(&cx.shared.store).watchdog_timeout_s;

        // First poll only schedules the first tick one second out
        let cadence = self
            .cadence
            .get_or_insert_with(|| CadenceTimer::new(TICK_MS, now + TICK_MS as u64));
        let timer = self.timer.get_or_insert_with(|| WatchdogTimer::new(threshold));

        if !cadence.is_ready(now) {
            return Step::Sleep(cadence.time_until_next(now) as u32);
        }
        timer.set_threshold(threshold);

        if cx.shared.flags.take(Flag::Activity) {
            timer.feed();
        } else if timer.tick(1) {
            cx.shared.flags.set(Flag::SleepRequested);

            #[cfg(feature = "defmt")]
            defmt::info!("idle for {}s, requesting sleep", timer.elapsed_s());
        }

        Step::Sleep(cadence.time_until_next(now) as u32)
    }
}
