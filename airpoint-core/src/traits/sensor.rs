//! Inertial sensor trait

use crate::motion::Sample;

/// Errors that can occur reading the inertial sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Bus transaction failed (NACK, arbitration loss, timeout)
    Bus,
    /// Device did not identify as the expected part
    WrongDevice,
    /// Sensor has not produced a fresh reading
    NotReady,
}

/// Trait for 6-axis inertial sensors
///
/// Implementations return angular rate in rad/s and acceleration in m/s².
/// A call must complete within one cadence period.
pub trait MotionSensor {
    /// Take one reading
    fn sample(&mut self) -> Result<Sample, SensorError>;
}
