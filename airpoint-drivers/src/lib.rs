//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in airpoint-core:
//!
//! - Inertial sensor (MPU-6050 over I2C)
//! - Battery gauge (1S LiPo through a resistor divider)

#![no_std]
#![deny(unsafe_code)]

pub mod battery;
pub mod imu;
