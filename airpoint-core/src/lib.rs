//! Board-agnostic core logic for the Airpoint motion controller
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Collaborator traits (motion sensor, HID sink, transport, channel, storage, battery)
//! - Sample window and drift-correcting cadence timer
//! - Pointer banding and gesture classification
//! - Gesture/mode action table
//! - JSON configuration store and tunables
//! - Inactivity watchdog and battery status
//! - Cooperative tasks and the supervisor that runs them

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

pub mod config;
pub mod dispatch;
pub mod error;
pub mod motion;
pub mod power;
pub mod signals;
pub mod supervisor;
pub mod tasks;
pub mod timing;
pub mod traits;

pub use supervisor::Supervisor;
