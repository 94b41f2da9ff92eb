//! Link supervision after the first connection
//!
//! Sleeps until [`Flag::Connected`] is first raised, then watches the
//! transport. A dropped link raises [`Flag::ConnectionLost`] and restarts
//! advertising. While a sleep request is pending every host is dropped and
//! advertising stays off; clearing the request resumes advertising.

use crate::signals::Flag;

use super::connection::{ConnectionState, CONNECTION_POLL_MS};
use super::{Context, Step, Task};

/// Reconnect state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum Phase {
    /// Waiting for the first connection
    #[default]
    Waiting,
    Watching,
    Suspended,
}

/// Watches the link and re-advertises on loss
#[derive(Debug, Clone, Default)]
pub struct ReconnectTask {
    phase: Phase,
    drops: u32,
}

impl ReconnectTask {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of link drops seen
    pub fn drops(&self) -> u32 {
        self.drops
    }

    pub fn is_suspended(&self) -> bool {
        self.phase == Phase::Suspended
    }

    fn watch(&mut self, cx: &mut Context<'_, '_>) {
        let connected = cx.io.transport.is_connected();
        let flagged = cx.shared.flags.is_set(Flag::Connected);

        if flagged && !connected {
            self.drops = self.drops.saturating_add(1);
            cx.shared.flags.clear(Flag::Connected);
            cx.shared.flags.set(Flag::ConnectionLost);
            cx.io.transport.begin_advertising();
            cx.shared.link = ConnectionState::Advertising;

            #[cfg(feature = "defmt")]
            defmt::warn!("link lost, advertising");
        } else if !flagged && connected {
            cx.shared.flags.set(Flag::Connected);
            cx.shared.flags.clear(Flag::ConnectionLost);
            cx.shared.link = ConnectionState::Connected;

            #[cfg(feature = "defmt")]
            defmt::info!("link restored");
        }
    }
}

impl Task for ReconnectTask {
    fn name(&self) -> &'static str {
        "reconnect"
    }

    fn poll(&mut self, cx: &mut Context<'_, '_>) -> Step {
        let sleeping = cx.shared.flags.is_set(Flag::SleepRequested);

        match self.phase {
            Phase::Waiting => {
                if !cx.shared.flags.is_set(Flag::Connected) {
                    return Step::WaitFor(Flag::Connected);
                }
                self.phase = Phase::Watching;
            }
            Phase::Suspended if !sleeping => {
                self.phase = Phase::Watching;
                cx.io.transport.begin_advertising();
                cx.shared.link = ConnectionState::Advertising;

                #[cfg(feature = "defmt")]
                defmt::info!("awake, advertising");
            }
            Phase::Suspended => return Step::Sleep(CONNECTION_POLL_MS),
            Phase::Watching => {}
        }

        if sleeping {
            self.phase = Phase::Suspended;
            cx.io.transport.disconnect_all();
            cx.shared.flags.clear(Flag::Connected);
            cx.shared.link = ConnectionState::Disconnected;

            #[cfg(feature = "defmt")]
            defmt::info!("sleep requested, link down");
            return Step::Sleep(CONNECTION_POLL_MS);
        }

        self.watch(cx);
        Step::Sleep(CONNECTION_POLL_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StateStore;
    use crate::tasks::testing::Bench;
    use crate::tasks::Shared;

    fn connected() -> (ReconnectTask, Bench, Shared) {
        let task = ReconnectTask::new();
        let mut bench = Bench::default();
        let mut shared = Shared::new(StateStore::new());
        bench.transport.connected = true;
        shared.flags.set(Flag::Connected);
        (task, bench, shared)
    }

    #[test]
    fn test_waits_for_first_connection() {
        let mut task = ReconnectTask::new();
        let mut bench = Bench::default();
        let mut shared = Shared::new(StateStore::new());

        assert_eq!(
            bench.poll(&mut task, &mut shared, 0),
            Step::WaitFor(Flag::Connected)
        );
        assert_eq!(bench.transport.advertise_calls, 0);
    }

    #[test]
    fn test_drop_and_restore() {
        let (mut task, mut bench, mut shared) = connected();
        shared.store = StateStore::with_defaults();
        shared.store.merge_json(r#"{"profile": {"hand": "left"}}"#).unwrap();
        let store = shared.store.clone();
        assert_eq!(bench.poll(&mut task, &mut shared, 0), Step::Sleep(250));

        bench.transport.connected = false;
        bench.poll(&mut task, &mut shared, 250);
        assert!(shared.flags.is_set(Flag::ConnectionLost));
        assert!(!shared.flags.is_set(Flag::Connected));
        assert_eq!(bench.transport.advertise_calls, 1);
        assert_eq!(task.drops(), 1);

        // Still down: no second advertise
        bench.poll(&mut task, &mut shared, 500);
        assert_eq!(bench.transport.advertise_calls, 1);

        bench.transport.connected = true;
        bench.poll(&mut task, &mut shared, 750);
        assert!(shared.flags.is_set(Flag::Connected));
        assert!(!shared.flags.is_set(Flag::ConnectionLost));
        assert_eq!(shared.link, ConnectionState::Connected);
        // Configuration survives the drop
        assert_eq!(shared.store, store);
    }

    #[test]
    fn test_sleep_suspends_link() {
        let (mut task, mut bench, mut shared) = connected();
        bench.poll(&mut task, &mut shared, 0);

        shared.flags.set(Flag::SleepRequested);
        bench.poll(&mut task, &mut shared, 250);
        bench.poll(&mut task, &mut shared, 500);
        assert!(task.is_suspended());
        assert_eq!(bench.transport.disconnect_calls, 1);
        assert!(!shared.flags.is_set(Flag::Connected));
        // A deliberate sleep is not a lost link
        assert!(!shared.flags.is_set(Flag::ConnectionLost));

        shared.flags.clear(Flag::SleepRequested);
        bench.poll(&mut task, &mut shared, 750);
        assert!(!task.is_suspended());
        assert_eq!(bench.transport.advertise_calls, 1);
        assert_eq!(shared.link, ConnectionState::Advertising);
    }
}
