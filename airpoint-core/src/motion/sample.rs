//! Inertial samples

use core::ops::{Add, Mul};

/// One 6-axis reading
///
/// Angular rate is in rad/s, acceleration in m/s².
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample {
    pub gx: f32,
    pub gy: f32,
    pub gz: f32,
    pub ax: f32,
    pub ay: f32,
    pub az: f32,
}

impl Sample {
    /// Create a sample from angular rate only
    pub const fn gyro(gx: f32, gy: f32, gz: f32) -> Self {
        Self {
            gx,
            gy,
            gz,
            ax: 0.0,
            ay: 0.0,
            az: 0.0,
        }
    }

    /// Angular speed in the pointer plane, `sqrt(gy² + gz²)`
    pub fn pointer_magnitude(&self) -> f32 {
        libm::sqrtf(self.gy * self.gy + self.gz * self.gz)
    }
}

impl Add for Sample {
    type Output = Sample;

    fn add(self, rhs: Sample) -> Sample {
        Sample {
            gx: self.gx + rhs.gx,
            gy: self.gy + rhs.gy,
            gz: self.gz + rhs.gz,
            ax: self.ax + rhs.ax,
            ay: self.ay + rhs.ay,
            az: self.az + rhs.az,
        }
    }
}

impl Mul<f32> for Sample {
    type Output = Sample;

    fn mul(self, k: f32) -> Sample {
        Sample {
            gx: self.gx * k,
            gy: self.gy * k,
            gz: self.gz * k,
            ax: self.ax * k,
            ay: self.ay * k,
            az: self.az * k,
        }
    }
}
