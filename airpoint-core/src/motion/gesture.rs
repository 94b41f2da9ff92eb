//! Gesture detection over a full sample window
//!
//! A window is summarised by its mean angular rate per axis and by the number
//! of sign reversals among strong gy/gz samples. Each gesture has an active
//! condition and an armed flag:
//!
//! - the highest-priority active gesture is the candidate for this cycle
//!   (shake, then roll, then directional flicks);
//! - the candidate fires only if armed, and firing disarms it;
//! - a gesture re-arms once its condition is no longer active.
//!
//! Holding a motion therefore fires once, and the same gesture needs the
//! signal to drop below threshold before it can fire again.

use crate::config::GestureTunables;
use crate::dispatch::GestureEvent;

use super::sample::Sample;
use super::window::SampleWindow;

/// Gestures in priority order
const PRIORITY: [GestureEvent; 8] = [
    GestureEvent::ShakeYes,
    GestureEvent::ShakeNo,
    GestureEvent::RollRight,
    GestureEvent::RollLeft,
    GestureEvent::Right,
    GestureEvent::Left,
    GestureEvent::Down,
    GestureEvent::Up,
];

/// Summary statistics of one window
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WindowStats {
    pub mean_gx: f32,
    pub mean_gy: f32,
    pub mean_gz: f32,
    pub reversals_gy: u8,
    pub reversals_gz: u8,
}

impl WindowStats {
    /// Compute statistics; `None` for an empty window
    pub fn compute<const N: usize>(
        window: &SampleWindow<Sample, N>,
        shake_threshold: f32,
    ) -> Option<Self> {
        let mean = window.average()?;
        Some(Self {
            mean_gx: mean.gx,
            mean_gy: mean.gy,
            mean_gz: mean.gz,
            reversals_gy: count_reversals(window.iter().map(|s| s.gy), shake_threshold),
            reversals_gz: count_reversals(window.iter().map(|s| s.gz), shake_threshold),
        })
    }

    /// Check if a gesture's condition holds for this window
    pub fn is_active(&self, event: GestureEvent, t: &GestureTunables) -> bool {
        let (x, y, z) = (
            libm::fabsf(self.mean_gx),
            libm::fabsf(self.mean_gy),
            libm::fabsf(self.mean_gz),
        );
        let x_dominant = x > y && x > z;
        let y_dominant = y >= x && y > z;
        let z_dominant = z >= x && z >= y;

        match event {
            GestureEvent::None => false,
            GestureEvent::ShakeYes => self.reversals_gz >= t.shake_reversals,
            GestureEvent::ShakeNo => self.reversals_gy >= t.shake_reversals,
            GestureEvent::RollRight => x_dominant && x >= t.roll_threshold && self.mean_gx > 0.0,
            GestureEvent::RollLeft => x_dominant && x >= t.roll_threshold && self.mean_gx < 0.0,
            GestureEvent::Right => y_dominant && y >= t.flick_threshold && self.mean_gy > 0.0,
            GestureEvent::Left => y_dominant && y >= t.flick_threshold && self.mean_gy < 0.0,
            GestureEvent::Down => z_dominant && z >= t.flick_threshold && self.mean_gz > 0.0,
            GestureEvent::Up => z_dominant && z >= t.flick_threshold && self.mean_gz < 0.0,
        }
    }
}

/// Count sign changes between consecutive strong values
fn count_reversals(values: impl Iterator<Item = f32>, threshold: f32) -> u8 {
    let mut last_positive: Option<bool> = None;
    let mut reversals = 0u8;
    for v in values.filter(|v| libm::fabsf(*v) >= threshold) {
        let positive = v > 0.0;
        if last_positive.is_some_and(|p| p != positive) {
            reversals = reversals.saturating_add(1);
        }
        last_positive = Some(positive);
    }
    reversals
}

/// Threshold and hysteresis state per gesture
#[derive(Debug, Clone)]
pub struct GestureDetector {
    armed: [bool; GestureEvent::COUNT],
}

impl Default for GestureDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureDetector {
    pub fn new() -> Self {
        Self {
            armed: [true; GestureEvent::COUNT],
        }
    }

    /// Check if a gesture may fire
    pub fn is_armed(&self, event: GestureEvent) -> bool {
        self.armed[event.index()]
    }

    /// Re-arm every gesture
    pub fn reset(&mut self) {
        self.armed = [true; GestureEvent::COUNT];
    }

    /// Evaluate a window
    ///
    /// A window that is not yet full yields `None` without touching the
    /// armed flags.
    pub fn evaluate<const N: usize>(
        &mut self,
        window: &SampleWindow<Sample, N>,
        tunables: &GestureTunables,
    ) -> GestureEvent {
        if !window.is_full() {
            return GestureEvent::None;
        }
        let Some(stats) = WindowStats::compute(window, tunables.shake_threshold) else {
            return GestureEvent::None;
        };

        let mut candidate = None;
        for event in PRIORITY {
            if stats.is_active(event, tunables) {
                if candidate.is_none() {
                    candidate = Some(event);
                }
            } else {
                self.armed[event.index()] = true;
            }
        }

        match candidate {
            Some(event) if self.armed[event.index()] => {
                self.armed[event.index()] = false;
                event
            }
            _ => GestureEvent::None,
        }
    }
}
