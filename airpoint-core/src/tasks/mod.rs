//! Cooperative tasks
//!
//! Each task is a small state machine polled by the [`Supervisor`]. A poll
//! runs one bounded step and says when it wants to run again. Tasks talk to
//! each other only through [`SignalFlags`] and the shared store.
//!
//! [`Supervisor`]: crate::supervisor::Supervisor

pub mod battery;
pub mod channel;
pub mod connection;
pub mod reconnect;
pub mod sampling;
pub mod watchdog;

pub use battery::BatteryTask;
pub use channel::ChannelTask;
pub use connection::{ConnectionState, ConnectionTask};
pub use reconnect::ReconnectTask;
pub use sampling::{SamplingDispatchTask, MAX_SENSOR_FAILURES};
pub use watchdog::WatchdogTask;

use crate::config::StateStore;
use crate::power::BatteryStatus;
use crate::signals::{Flag, SignalFlags};
use crate::traits::{
    BatterySensor, ConfigPersistence, DebugChannel, HidSink, MotionSensor, Transport,
};

/// What a task wants after a poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    /// Poll again on the next pass
    Yield,
    /// Poll again after this many milliseconds
    Sleep(u32),
    /// Poll again once the flag is set
    WaitFor(Flag),
    /// Never poll again
    Exit,
}

/// State shared by all tasks
#[derive(Debug, Clone, Default)]
pub struct Shared {
    pub store: StateStore,
    pub flags: SignalFlags,
    pub battery: BatteryStatus,
    pub link: ConnectionState,
}

impl Shared {
    pub fn new(store: StateStore) -> Self {
        Self {
            store,
            flags: SignalFlags::new(),
            battery: BatteryStatus::new(),
            link: ConnectionState::Disconnected,
        }
    }
}

/// Board collaborators
pub struct Io<'a> {
    pub sensor: &'a mut dyn MotionSensor,
    pub hid: &'a mut dyn HidSink,
    pub transport: &'a mut dyn Transport,
    pub channel: &'a mut dyn DebugChannel,
    pub persistence: &'a mut dyn ConfigPersistence,
    pub battery: &'a mut dyn BatterySensor,
}

/// Everything a task may touch during one poll
pub struct Context<'s, 'io> {
    /// Monotonic time in milliseconds
    pub now_ms: u64,
    pub shared: &'s mut Shared,
    pub io: &'s mut Io<'io>,
}

/// A cooperatively scheduled unit of work
pub trait Task {
    /// Name used in logs
    fn name(&self) -> &'static str;

    /// Run one bounded step
    fn poll(&mut self, cx: &mut Context<'_, '_>) -> Step;
}
