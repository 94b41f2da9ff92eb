//! Airpoint wire protocols
//!
//! Two protocols live here:
//!
//! - [`channel`]: the chunked text protocol a host uses to tune the device
//!   over one bounded read/write value (512 bytes per write).
//! - [`link`]: the framed UART link between the RP2040 and the radio
//!   co-processor that owns the wireless stack.
//!
//! Link frames use a simple binary format:
//! ```text
//! ┌───────┬────────┬──────┬─────────────┬──────────┐
//! │ START │ LENGTH │ TYPE │ PAYLOAD     │ CHECKSUM │
//! │ 1B    │ 2B LE  │ 1B   │ 0–520B      │ 1B       │
//! └───────┴────────┴──────┴─────────────┴──────────┘
//! ```

#![no_std]
#![deny(unsafe_code)]

pub mod channel;
pub mod link;

pub use channel::{ChannelSession, Command, ProtocolError, Reaction, Sentinel, CHUNK_CAPACITY};
pub use link::{DeviceMessage, Frame, FrameError, FrameParser, RadioMessage};
