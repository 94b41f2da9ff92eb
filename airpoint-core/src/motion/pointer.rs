//! Pointer delta from angular rate
//!
//! The pointer follows rotation in the gy/gz plane. Speed is banded so slow
//! motion gives fine control and fast motion covers the screen:
//!
//! | magnitude            | delta length           |
//! |----------------------|------------------------|
//! | ≤ idle               | 0, idle count + 1      |
//! | ≤ slow               | magnitude × slow_scale |
//! | ≤ fast               | magnitude × mid_scale  |
//! | > fast               | magnitude × fast_scale |
//!
//! After more than `settle_cycles` consecutive idle cycles the pointer is
//! settled and stays settled until the magnitude rises above the slow
//! threshold, so sensor drift cannot wake it.

use crate::config::PointerTunables;

use super::sample::Sample;

/// Pointer result for one cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PointerOutput {
    /// Move by a delta in device units
    Move { dx: i16, dy: i16 },
    /// Below the idle threshold
    Idle,
    /// Idle long enough that pointer motion has ended
    Settled,
}

impl PointerOutput {
    /// Delta to apply, if moving
    pub fn delta(&self) -> Option<(i16, i16)> {
        match self {
            PointerOutput::Move { dx, dy } => Some((*dx, *dy)),
            _ => None,
        }
    }

    pub fn is_moving(&self) -> bool {
        matches!(self, PointerOutput::Move { .. })
    }
}

/// Speed banding and idle tracking
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    idle_count: u32,
    settled: bool,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self {
            idle_count: 0,
            settled: false,
        }
    }

    /// Consecutive idle cycles
    pub fn idle_count(&self) -> u32 {
        self.idle_count
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Forget idle history
    pub fn reset(&mut self) {
        self.idle_count = 0;
        self.settled = false;
    }

    /// Scaled magnitude used for banding
    pub fn magnitude(sample: &Sample, tunables: &PointerTunables) -> f32 {
        tunables.sensitivity * sample.pointer_magnitude()
    }

    /// Process one sample
    pub fn update(&mut self, sample: &Sample, tunables: &PointerTunables) -> PointerOutput {
        let magnitude = Self::magnitude(sample, tunables);

        if self.settled {
            if magnitude <= tunables.slow_threshold {
                self.idle_count = self.idle_count.saturating_add(1);
                return PointerOutput::Settled;
            }
            self.settled = false;
        }

        // Zero magnitude always lands here, before atan2
        if magnitude <= tunables.idle_threshold {
            self.idle_count = self.idle_count.saturating_add(1);
            if self.idle_count > tunables.settle_cycles {
                self.settled = true;
                return PointerOutput::Settled;
            }
            return PointerOutput::Idle;
        }

        self.idle_count = 0;
        let scale = if magnitude <= tunables.slow_threshold {
            magnitude * tunables.slow_scale
        } else if magnitude <= tunables.fast_threshold {
            magnitude * tunables.mid_scale
        } else {
            magnitude * tunables.fast_scale
        };

        let angle = libm::atan2f(sample.gz, sample.gy);
        PointerOutput::Move {
            dx: libm::roundf(scale * libm::cosf(angle)) as i16,
            dy: libm::roundf(scale * libm::sinf(angle)) as i16,
        }
    }
}
