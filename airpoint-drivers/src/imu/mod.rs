//! Inertial measurement units

pub mod mpu6050;

pub use mpu6050::{Mpu6050, DEFAULT_ADDRESS as MPU6050_ADDRESS};
