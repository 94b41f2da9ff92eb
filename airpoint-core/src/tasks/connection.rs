//! Initial connection task
//!
//! Advertises once and waits for the first host. Once a host connects the
//! task raises [`Flag::Connected`] and exits; link supervision from then on
//! belongs to the reconnect task.

use crate::signals::Flag;

use super::{Context, Step, Task};

/// Transport poll interval while waiting for a host
pub const CONNECTION_POLL_MS: u32 = 250;

/// Link state as seen by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Advertising,
    Connected,
}

/// Waits for the first host
#[derive(Debug, Clone, Default)]
pub struct ConnectionTask {
    advertising: bool,
}

impl ConnectionTask {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Task for ConnectionTask {
    fn name(&self) -> &'static str {
        "connection"
    }

    fn poll(&mut self, cx: &mut Context<'_, '_>) -> Step {
        if cx.io.transport.is_connected() {
            cx.shared.link = ConnectionState::Connected;
            cx.shared.flags.set(Flag::Connected);
            cx.shared.flags.clear(Flag::ConnectionLost);

            #[cfg(feature = "defmt")]
            defmt::info!("host connected");
            return Step::Exit;
        }

        if !self.advertising {
            self.advertising = true;
            cx.io.transport.begin_advertising();
            cx.shared.link = ConnectionState::Advertising;

            #[cfg(feature = "defmt")]
            defmt::info!("advertising");
        }
        Step::Sleep(CONNECTION_POLL_MS)
    }
}
