//! Sampling and dispatch task
//!
//! Each cadence tick: read the sensor, push into the window, classify,
//! and dispatch the result against the current mode. Output only reaches
//! the HID sink while a host is connected.
//!
//! While a sleep request is pending the task dozes: the window is dropped,
//! the sensor is polled slowly, and deliberate motion (above the slow
//! pointer threshold) clears the request.

use crate::config::Tunables;
use crate::dispatch::{DispatchTable, GestureEvent, OperatingMode};
use crate::motion::{MotionClassifier, PointerTracker, Sample, SampleWindow, WINDOW_LEN};
use crate::signals::Flag;
use crate::timing::CadenceTimer;
use crate::traits::SensorError;

use super::{Context, Step, Task};

/// Consecutive sensor errors before sampling stops
pub const MAX_SENSOR_FAILURES: u8 = 5;

/// Sensor poll interval while dozing
pub const DOZE_POLL_MS: u32 = 200;

/// Cadence-driven motion pipeline
#[derive(Debug, Clone, Default)]
pub struct SamplingDispatchTask {
    cadence: Option<CadenceTimer>,
    window: SampleWindow<Sample, WINDOW_LEN>,
    classifier: MotionClassifier,
    dispatch: DispatchTable,
    failures: u8,
    dozing: bool,
}

impl SamplingDispatchTask {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current operating mode
    pub fn mode(&self) -> OperatingMode {
        self.dispatch.mode()
    }

    /// Consecutive sensor failures
    pub fn failures(&self) -> u8 {
        self.failures
    }

    pub fn is_dozing(&self) -> bool {
        self.dozing
    }

    /// Returns true once the failure limit is reached
    fn record_failure(&mut self, cx: &mut Context<'_, '_>, _error: SensorError) -> bool {
        self.failures = self.failures.saturating_add(1);

        #[cfg(feature = "defmt")]
        defmt::warn!(
            "sensor error {} ({}/{})",
            _error,
            self.failures,
            MAX_SENSOR_FAILURES
        );

        if self.failures >= MAX_SENSOR_FAILURES {
            cx.shared.flags.set(Flag::SensorFault);
            return true;
        }
        false
    }

    fn doze(&mut self, cx: &mut Context<'_, '_>, tunables: &Tunables) -> Step {
        if !self.dozing {
            self.dozing = true;
            self.window.clear();
            self.classifier.reset();
        }

        match cx.io.sensor.sample() {
            Ok(sample) => {
                self.failures = 0;
                if PointerTracker::magnitude(&sample, &tunables.pointer)
                    > tunables.pointer.slow_threshold
                {
                    cx.shared.flags.clear(Flag::SleepRequested);
                    cx.shared.flags.set(Flag::Activity);
                    self.wake(cx.now_ms, tunables);
                    return Step::Yield;
                }
            }
            Err(e) => {
                if self.record_failure(cx, e) {
                    return Step::Exit;
                }
            }
        }
        Step::Sleep(DOZE_POLL_MS)
    }

    fn wake(&mut self, now_ms: u64, tunables: &Tunables) {
        self.dozing = false;
        self.cadence = Some(CadenceTimer::new(tunables.sampling_period_ms, now_ms));
    }
}

impl Task for SamplingDispatchTask {
    fn name(&self) -> &'static str {
        "sampling"
    }

    fn poll(&mut self, cx: &mut Context<'_, '_>) -> Step {
        // One read of the store per cycle
        let tunables = Tunables::from_store(&cx.shared.store);
        let now = cx.now_ms;

        if cx.shared.flags.is_set(Flag::SleepRequested) {
            return self.doze(cx, &tunables);
        }
        if self.dozing {
            self.wake(now, &tunables);
        }

        let cadence = self
            .cadence
            .get_or_insert_with(|| CadenceTimer::new(tunables.sampling_period_ms, now));
        if cadence.period_ms() != tunables.sampling_period_ms {
            cadence.set_period(tunables.sampling_period_ms, now);
        }
        if !cadence.is_ready(now) {
            return Step::Sleep(cadence.time_until_next(now) as u32);
        }
        let next = cadence.time_until_next(now) as u32;

        let sample = match cx.io.sensor.sample() {
            Ok(sample) => {
                self.failures = 0;
                sample
            }
            Err(e) => {
                if self.record_failure(cx, e) {
                    return Step::Exit;
                }
                return Step::Sleep(next);
            }
        };

        self.window.push(sample);
        let classification = self.classifier.classify(&sample, &self.window, &tunables);
        let mut activity = classification.is_motion();

        if cx.shared.flags.is_set(Flag::Connected) {
            let outcome = self.dispatch.dispatch(
                classification.gesture,
                classification.pointer.delta(),
                tunables.scroll_step,
                cx.io.hid,
            );
            activity |= outcome.had_effect();

            #[cfg(feature = "defmt")]
            if outcome.mode_changed() {
                defmt::info!("mode {} -> {}", outcome.previous, outcome.mode);
            }
        } else if classification.gesture != GestureEvent::None {
            #[cfg(feature = "defmt")]
            defmt::debug!("{} dropped, not connected", classification.gesture);
        }

        if activity {
            cx.shared.flags.set(Flag::Activity);
        }
        Step::Sleep(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StateStore;
    use crate::tasks::testing::{Bench, HidCall};
    use crate::tasks::Shared;

    fn connected_shared() -> Shared {
        let mut shared = Shared::new(StateStore::with_defaults());
        shared.flags.set(Flag::Connected);
        shared
    }

    /// Run cycles `12 ms` apart starting at `start`, returning the next time
    fn run_cycles(
        task: &mut SamplingDispatchTask,
        bench: &mut Bench,
        shared: &mut Shared,
        start: u64,
        cycles: usize,
    ) -> u64 {
        let mut now = start;
        for _ in 0..cycles {
            assert_eq!(bench.poll(task, shared, now), Step::Sleep(12));
            now += 12;
        }
        now
    }

    /// Enter mouse mode with a held right roll
    fn roll_into_mouse_mode(
        task: &mut SamplingDispatchTask,
        bench: &mut Bench,
        shared: &mut Shared,
    ) -> u64 {
        bench.sensor.current = Ok(Sample::gyro(4.0, 0.0, 0.0));
        let now = run_cycles(task, bench, shared, 0, WINDOW_LEN);
        assert_eq!(task.mode(), OperatingMode::MouseButtons);
        now
    }

    #[test]
    fn test_sustained_motion_moves_pointer_each_cycle() {
        let mut task = SamplingDispatchTask::new();
        let mut bench = Bench::default();
        let mut shared = connected_shared();

        let now = roll_into_mouse_mode(&mut task, &mut bench, &mut shared);
        bench.hid.calls.clear();

        bench.sensor.current = Ok(Sample::gyro(0.0, 3.0, 0.0));
        run_cycles(&mut task, &mut bench, &mut shared, now, 5);

        assert_eq!(bench.hid.calls, [HidCall::Move(8, 0, 0); 5]);
        assert!(shared.flags.is_set(Flag::Activity));
    }

    #[test]
    fn test_cadence_gates_sampling() {
        let mut task = SamplingDispatchTask::new();
        let mut bench = Bench::default();
        let mut shared = connected_shared();

        assert_eq!(bench.poll(&mut task, &mut shared, 0), Step::Sleep(12));
        assert_eq!(bench.poll(&mut task, &mut shared, 5), Step::Sleep(7));
        assert_eq!(bench.sensor.reads, 1);
        bench.poll(&mut task, &mut shared, 12);
        assert_eq!(bench.sensor.reads, 2);
    }

    #[test]
    fn test_no_dispatch_while_disconnected() {
        let mut task = SamplingDispatchTask::new();
        let mut bench = Bench::default();
        let mut shared = Shared::new(StateStore::with_defaults());

        bench.sensor.current = Ok(Sample::gyro(4.0, 0.0, 0.0));
        run_cycles(&mut task, &mut bench, &mut shared, 0, WINDOW_LEN);

        assert_eq!(task.mode(), OperatingMode::Idle);
        assert!(bench.hid.calls.is_empty());
        // Motion still counts as activity
        assert!(shared.flags.is_set(Flag::Activity));
    }

    #[test]
    fn test_still_device_reports_no_activity() {
        let mut task = SamplingDispatchTask::new();
        let mut bench = Bench::default();
        let mut shared = connected_shared();

        run_cycles(&mut task, &mut bench, &mut shared, 0, 20);
        assert!(!shared.flags.is_set(Flag::Activity));
        assert!(bench.hid.calls.is_empty());
    }

    #[test]
    fn test_sensor_failures_exit() {
        let mut task = SamplingDispatchTask::new();
        let mut bench = Bench::default();
        let mut shared = connected_shared();
        bench.sensor.current = Err(SensorError::Bus);

        let mut now = 0;
        for _ in 0..MAX_SENSOR_FAILURES - 1 {
            assert_eq!(bench.poll(&mut task, &mut shared, now), Step::Sleep(12));
            now += 12;
        }
        assert_eq!(bench.poll(&mut task, &mut shared, now), Step::Exit);
        assert!(shared.flags.is_set(Flag::SensorFault));
    }

    #[test]
    fn test_single_failure_recovers() {
        let mut task = SamplingDispatchTask::new();
        let mut bench = Bench::default();
        let mut shared = connected_shared();

        bench.sensor.current = Err(SensorError::NotReady);
        bench.poll(&mut task, &mut shared, 0);
        assert_eq!(task.failures(), 1);

        bench.sensor.current = Ok(Sample::default());
        bench.poll(&mut task, &mut shared, 12);
        assert_eq!(task.failures(), 0);
    }

    #[test]
    fn test_doze_and_wake() {
        let mut task = SamplingDispatchTask::new();
        let mut bench = Bench::default();
        let mut shared = connected_shared();
        shared.flags.set(Flag::SleepRequested);

        assert_eq!(bench.poll(&mut task, &mut shared, 0), Step::Sleep(DOZE_POLL_MS));
        assert!(task.is_dozing());

        // Drift does not wake
        bench.sensor.current = Ok(Sample::gyro(0.0, 1.0, 0.0));
        assert_eq!(bench.poll(&mut task, &mut shared, 200), Step::Sleep(DOZE_POLL_MS));
        assert!(shared.flags.is_set(Flag::SleepRequested));

        bench.sensor.current = Ok(Sample::gyro(0.0, 3.0, 0.0));
        assert_eq!(bench.poll(&mut task, &mut shared, 400), Step::Yield);
        assert!(!shared.flags.is_set(Flag::SleepRequested));
        assert!(shared.flags.is_set(Flag::Activity));
        assert!(!task.is_dozing());
        assert!(bench.hid.calls.is_empty());
    }

    #[test]
    fn test_period_follows_store() {
        let mut task = SamplingDispatchTask::new();
        let mut bench = Bench::default();
        let mut shared = connected_shared();

        assert_eq!(bench.poll(&mut task, &mut shared, 0), Step::Sleep(12));
        shared
            .store
            .merge_json(r#"{"sampling": {"period_ms": 20}}"#)
            .unwrap();
        assert_eq!(bench.poll(&mut task, &mut shared, 12), Step::Sleep(20));
    }
}
