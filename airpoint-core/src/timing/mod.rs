//! Timing primitives

pub mod cadence;

pub use cadence::CadenceTimer;
