//! Round-robin task supervisor
//!
//! Owns the shared state, the board collaborators and one instance of each
//! task. [`Supervisor::run_once`] polls every task that is due, in a fixed
//! order, and returns the earliest time anything needs to run again. The
//! caller decides how to wait; the supervisor never reads a clock itself.
//!
//! A task that exits stays exited. The others keep running.

use crate::config::StateStore;
use crate::dispatch::OperatingMode;
use crate::signals::Flag;
use crate::tasks::{
    BatteryTask, ChannelTask, ConnectionTask, Context, Io, ReconnectTask, SamplingDispatchTask,
    Shared, Step, Task, WatchdogTask,
};

/// Re-check interval when every live task waits on an unset flag
pub const FLAG_POLL_MS: u64 = 50;

/// Supervised tasks, in poll order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TaskId {
    Connection,
    Reconnect,
    Sampling,
    Watchdog,
    Battery,
    Channel,
}

impl TaskId {
    pub const COUNT: usize = 6;

    pub const ALL: [TaskId; Self::COUNT] = [
        TaskId::Connection,
        TaskId::Reconnect,
        TaskId::Sampling,
        TaskId::Watchdog,
        TaskId::Battery,
        TaskId::Channel,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// When a task should next be polled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Wake {
    /// On the next pass
    Ready,
    /// At or after this time
    At(u64),
    /// Once the flag is set
    Flag(Flag),
    Exited,
}

impl Wake {
    fn from_step(step: Step, now_ms: u64) -> Self {
        match step {
            Step::Yield => Wake::Ready,
            Step::Sleep(ms) => Wake::At(now_ms + ms as u64),
            Step::WaitFor(flag) => Wake::Flag(flag),
            Step::Exit => Wake::Exited,
        }
    }
}

/// Cooperative executor for the device tasks
pub struct Supervisor<'io> {
    shared: Shared,
    io: Io<'io>,
    connection: ConnectionTask,
    reconnect: ReconnectTask,
    sampling: SamplingDispatchTask,
    watchdog: WatchdogTask,
    battery: BatteryTask,
    channel: ChannelTask,
    wake: [Wake; TaskId::COUNT],
}

impl<'io> Supervisor<'io> {
    /// Create a supervisor with every task ready to run
    pub fn new(store: StateStore, io: Io<'io>) -> Self {
        Self {
            shared: Shared::new(store),
            io,
            connection: ConnectionTask::new(),
            reconnect: ReconnectTask::new(),
            sampling: SamplingDispatchTask::new(),
            watchdog: WatchdogTask::new(),
            battery: BatteryTask::new(),
            channel: ChannelTask::new(),
            wake: [Wake::Ready; TaskId::COUNT],
        }
    }

    pub fn shared(&self) -> &Shared {
        &self.shared
    }

    pub fn shared_mut(&mut self) -> &mut Shared {
        &mut self.shared
    }

    /// Current operating mode
    pub fn mode(&self) -> OperatingMode {
        self.sampling.mode()
    }

    /// Scheduling state of a task
    pub fn wake(&self, id: TaskId) -> Wake {
        self.wake[id.index()]
    }

    /// Check if every task has exited
    pub fn is_finished(&self) -> bool {
        self.wake.iter().all(|w| *w == Wake::Exited)
    }

    /// Poll each due task once
    ///
    /// Returns the next deadline, or `None` once every task has exited. A
    /// deadline at or before `now_ms` means another pass is due immediately.
    pub fn run_once(&mut self, now_ms: u64) -> Option<u64> {
        for id in TaskId::ALL {
            if !self.is_due(id, now_ms) {
                continue;
            }
            let step = self.poll_task(id, now_ms);
            self.wake[id.index()] = Wake::from_step(step, now_ms);
        }
        self.next_deadline(now_ms)
    }

    fn is_due(&self, id: TaskId, now_ms: u64) -> bool {
        match self.wake[id.index()] {
            Wake::Ready => true,
            Wake::At(deadline) => now_ms >= deadline,
            Wake::Flag(flag) => self.shared.flags.is_set(flag),
            Wake::Exited => false,
        }
    }

    fn poll_task(&mut self, id: TaskId, now_ms: u64) -> Step {
        let task: &mut dyn Task = match id {
            TaskId::Connection => &mut self.connection,
            TaskId::Reconnect => &mut self.reconnect,
            TaskId::Sampling => &mut self.sampling,
            TaskId::Watchdog => &mut self.watchdog,
            TaskId::Battery => &mut self.battery,
            TaskId::Channel => &mut self.channel,
        };
        let mut cx = Context {
            now_ms,
            shared: &mut self.shared,
            io: &mut self.io,
        };
        let step = task.poll(&mut cx);

        #[cfg(feature = "defmt")]
        if step == Step::Exit {
            defmt::warn!("task {=str} exited", task.name());
        }

        step
    }

    fn next_deadline(&self, now_ms: u64) -> Option<u64> {
        let mut next: Option<u64> = None;
        let mut waiting = false;

        for wake in self.wake {
            let at = match wake {
                Wake::Ready => now_ms,
                Wake::At(deadline) => deadline,
                Wake::Flag(flag) if self.shared.flags.is_set(flag) => now_ms,
                Wake::Flag(_) => {
                    waiting = true;
                    continue;
                }
                Wake::Exited => continue,
            };
            next = Some(next.map_or(at, |n| n.min(at)));
        }

        match next {
            Some(at) => Some(at),
            None if waiting => Some(now_ms + FLAG_POLL_MS),
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::Sample;
    use crate::tasks::testing::{Bench, HidCall};
    use crate::traits::{MotionSensor, SensorError, Transport};
    use alloc::vec::Vec;
    use core::cell::Cell;

    /// Plays samples in order, then repeats the last one
    struct SampleScript {
        samples: Vec<Sample>,
        reads: usize,
    }

    impl SampleScript {
        fn new() -> Self {
            Self {
                samples: Vec::new(),
                reads: 0,
            }
        }

        fn then(mut self, sample: Sample, count: usize) -> Self {
            self.samples.extend(core::iter::repeat(sample).take(count));
            self
        }
    }

    impl MotionSensor for SampleScript {
        fn sample(&mut self) -> Result<Sample, SensorError> {
            let index = self.reads.min(self.samples.len().saturating_sub(1));
            self.reads += 1;
            self.samples.get(index).copied().ok_or(SensorError::NotReady)
        }
    }

    fn supervisor<'a>(bench: &'a mut Bench, sensor: &'a mut dyn MotionSensor) -> Supervisor<'a> {
        let mut io = bench.io();
        io.sensor = sensor;
        Supervisor::new(StateStore::with_defaults(), io)
    }

    #[test]
    fn test_sustained_motion_in_mouse_mode() {
        let mut bench = Bench::default();
        bench.transport.connected = true;
        let mut sensor = SampleScript::new()
            .then(Sample::gyro(4.0, 0.0, 0.0), 8)
            .then(Sample::gyro(0.0, 3.0, 0.0), 5)
            .then(Sample::default(), 1);

        {
            let mut sup = supervisor(&mut bench, &mut sensor);
            // Thirteen cycles, 12 ms apart
            for now in 0..150 {
                sup.run_once(now);
            }
            assert_eq!(sup.mode(), OperatingMode::MouseButtons);
            assert!(sup.shared().flags.is_set(Flag::Connected));
        }

        assert_eq!(sensor.reads, 13);
        assert_eq!(bench.hid.calls, [HidCall::Move(8, 0, 0); 5]);
    }

    /// Link state the test flips while the supervisor holds the transport
    struct SwitchedLink<'a>(&'a Cell<bool>);

    impl Transport for SwitchedLink<'_> {
        fn is_connected(&self) -> bool {
            self.0.get()
        }
        fn begin_advertising(&mut self) {}
        fn disconnect_all(&mut self) {
            self.0.set(false);
        }
    }

    #[test]
    fn test_mode_and_store_survive_link_drop() {
        let up = Cell::new(true);
        let mut transport = SwitchedLink(&up);
        let mut bench = Bench::default();
        let mut sensor = SampleScript::new()
            .then(Sample::gyro(4.0, 0.0, 0.0), 8)
            .then(Sample::default(), 1);

        let mut io = bench.io();
        io.sensor = &mut sensor;
        io.transport = &mut transport;
        let mut sup = Supervisor::new(StateStore::with_defaults(), io);
        sup.shared_mut()
            .store
            .merge_json(r#"{"pointer": {"mid_scale": 3.0}}"#)
            .unwrap();

        for now in 0..150 {
            sup.run_once(now);
        }
        assert_eq!(sup.mode(), OperatingMode::MouseButtons);
        let store = sup.shared().store.clone();

        up.set(false);
        for now in 150..700 {
            sup.run_once(now);
        }
        assert!(sup.shared().flags.is_set(Flag::ConnectionLost));

        up.set(true);
        for now in 700..1_300 {
            sup.run_once(now);
        }
        assert!(sup.shared().flags.is_set(Flag::Connected));
        assert!(!sup.shared().flags.is_set(Flag::ConnectionLost));
        assert_eq!(sup.mode(), OperatingMode::MouseButtons);
        assert_eq!(sup.shared().store, store);
    }

    #[test]
    fn test_save_from_channel() {
        let mut bench = Bench::default();
        bench.transport.connected = true;
        bench.channel.host_write(b"Save");
        let mut sensor = SampleScript::new().then(Sample::default(), 1);

        let mode = {
            let mut sup = supervisor(&mut bench, &mut sensor);
            let before = sup.mode();
            let mut now = 0;
            while now < 1_000 {
                now = sup.run_once(now).unwrap_or(now).max(now + 1);
            }
            assert_eq!(sup.mode(), before);
            sup.mode()
        };

        assert_eq!(mode, OperatingMode::Idle);
        assert_eq!(bench.persistence.saved.len(), 1);
        assert_eq!(bench.channel.written_text(), ["Saving", "Complete"]);
    }

    fn with_watchdog_timeout(sup: &mut Supervisor<'_>, seconds: u32) {
        let doc = alloc::format!(r#"{{"watchdog": {{"timeout_s": {seconds}}}}}"#);
        sup.shared_mut().store.merge_json(&doc).unwrap();
    }

    #[test]
    fn test_fed_watchdog_never_requests_sleep() {
        let mut bench = Bench::default();
        let mut sensor = SampleScript::new().then(Sample::default(), 1);
        let mut sup = supervisor(&mut bench, &mut sensor);
        with_watchdog_timeout(&mut sup, 20);

        let mut now = 0;
        let mut next_feed = 4_000;
        while now < 100_000 {
            if now >= next_feed {
                sup.shared_mut().flags.set(Flag::Activity);
                next_feed += 4_000;
            }
            now = sup.run_once(now).unwrap();
            assert!(!sup.shared().flags.is_set(Flag::SleepRequested));
        }
    }

    #[test]
    fn test_unfed_watchdog_requests_sleep_at_threshold() {
        let mut bench = Bench::default();
        let mut sensor = SampleScript::new().then(Sample::default(), 1);
        let mut sup = supervisor(&mut bench, &mut sensor);
        with_watchdog_timeout(&mut sup, 20);

        let mut now = 0;
        loop {
            let next = sup.run_once(now).unwrap();
            let raised = sup.shared().flags.is_set(Flag::SleepRequested);
            if now < 20_000 {
                assert!(!raised, "raised early at {now}");
            } else {
                assert!(raised);
                break;
            }
            now = next;
        }
        assert_eq!(now, 20_000);
    }

    #[test]
    fn test_sensor_fault_leaves_other_tasks_running() {
        let mut bench = Bench::default();
        bench.sensor.current = Err(SensorError::Bus);
        let mut sup = Supervisor::new(StateStore::with_defaults(), bench.io());

        let mut now = 0;
        while now < 2_000 {
            now = sup.run_once(now).unwrap();
        }
        assert_eq!(sup.wake(TaskId::Sampling), Wake::Exited);
        assert!(sup.shared().flags.is_set(Flag::SensorFault));
        assert!(!sup.is_finished());
        assert!(matches!(sup.wake(TaskId::Watchdog), Wake::At(_)));
    }

    #[test]
    fn test_reconnect_waits_for_first_connection() {
        let mut bench = Bench::default();
        let mut sup = Supervisor::new(StateStore::with_defaults(), bench.io());

        sup.run_once(0);
        assert_eq!(sup.wake(TaskId::Reconnect), Wake::Flag(Flag::Connected));
        assert!(matches!(sup.wake(TaskId::Connection), Wake::At(250)));
    }
}
