//! Inter-task communication channels
//!
//! Static embassy-sync primitives connecting the UART link tasks, the flash
//! storage task and the supervisor task. The supervisor reaches them only
//! through the board bridges in [`crate::board`].

use alloc::string::String;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use portable_atomic::AtomicBool;

use airpoint_core::traits::PersistenceError;
use airpoint_protocol::link::{ChannelBytes, DeviceMessage};

/// Outbound queue depth; HID reports are dropped when full
const LINK_TX_SIZE: usize = 16;

/// Messages to the radio co-processor
pub static LINK_TX: Channel<CriticalSectionRawMutex, DeviceMessage, LINK_TX_SIZE> = Channel::new();

/// Latest value written by the host to the configuration channel
///
/// The radio relays the characteristic value, so only the newest one matters.
pub static CHANNEL_INBOX: Signal<CriticalSectionRawMutex, ChannelBytes> = Signal::new();

/// Host link state reported by the radio
pub static LINK_CONNECTED: AtomicBool = AtomicBool::new(false);

/// Serialised configuration to write to flash
pub static SAVE_REQUEST: Signal<CriticalSectionRawMutex, String> = Signal::new();

/// Outcome of the last flash write
pub static SAVE_RESULT: Signal<CriticalSectionRawMutex, Result<(), PersistenceError>> =
    Signal::new();

/// Restart request from the supervisor
pub static REBOOT: Signal<CriticalSectionRawMutex, ()> = Signal::new();
