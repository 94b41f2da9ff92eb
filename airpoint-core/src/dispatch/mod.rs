//! Gesture dispatch
//!
//! Turns classified events into HID actions and mode changes through a
//! total event × mode action table.

pub mod event;
pub mod table;

pub use event::{GestureEvent, OperatingMode};
pub use table::{Action, ActionContext, DispatchOutcome, DispatchTable};
