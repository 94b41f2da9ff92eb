//! Board collaborators
//!
//! Implementations of the core traits for the RP2040 wand: HID, transport
//! and channel go to the radio link, persistence to the flash storage task,
//! and the battery gauge reads the VSYS divider.

pub mod adc;
pub mod link;
pub mod persistence;

pub use adc::RpAdc;
pub use link::{LinkChannel, LinkHid, LinkTransport};
pub use persistence::FlashPersistence;
