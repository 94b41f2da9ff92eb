//! Motion classification
//!
//! Combines the per-sample pointer tracker with the window-level gesture
//! detector. Both outputs are produced every cycle.

use crate::config::Tunables;
use crate::dispatch::GestureEvent;

use super::gesture::GestureDetector;
use super::pointer::{PointerOutput, PointerTracker};
use super::sample::Sample;
use super::window::SampleWindow;

/// Classifier output for one cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Classification {
    pub pointer: PointerOutput,
    pub gesture: GestureEvent,
}

impl Classification {
    /// Check if the cycle saw any motion worth reporting as activity
    pub fn is_motion(&self) -> bool {
        self.pointer.is_moving() || self.gesture != GestureEvent::None
    }
}

/// Pointer and gesture classifier
#[derive(Debug, Clone, Default)]
pub struct MotionClassifier {
    pointer: PointerTracker,
    gestures: GestureDetector,
}

impl MotionClassifier {
    pub fn new() -> Self {
        Self {
            pointer: PointerTracker::new(),
            gestures: GestureDetector::new(),
        }
    }

    /// Classify the latest sample and the window holding it
    pub fn classify<const N: usize>(
        &mut self,
        sample: &Sample,
        window: &SampleWindow<Sample, N>,
        tunables: &Tunables,
    ) -> Classification {
        Classification {
            pointer: self.pointer.update(sample, &tunables.pointer),
            gesture: self.gestures.evaluate(window, &tunables.gesture),
        }
    }

    pub fn pointer(&self) -> &PointerTracker {
        &self.pointer
    }

    /// Clear idle history and re-arm all gestures
    pub fn reset(&mut self) {
        self.pointer.reset();
        self.gestures.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_zero_window() {
        let tunables = Tunables::default();
        let mut classifier = MotionClassifier::new();
        let mut window: SampleWindow<Sample, 8> = SampleWindow::new();

        for _ in 0..32 {
            let sample = Sample::default();
            window.push(sample);
            let out = classifier.classify(&sample, &window, &tunables);
            assert_eq!(out.pointer.delta(), None);
            assert_eq!(out.gesture, GestureEvent::None);
            assert!(!out.is_motion());
        }
    }

    #[test]
    fn test_sustained_mid_band_motion() {
        let tunables = Tunables::default();
        let mut classifier = MotionClassifier::new();
        let mut window: SampleWindow<Sample, 8> = SampleWindow::new();

        for _ in 0..5 {
            let sample = Sample::gyro(0.0, 3.0, 0.0);
            window.push(sample);
            let out = classifier.classify(&sample, &window, &tunables);
            assert_eq!(out.pointer, PointerOutput::Move { dx: 8, dy: 0 });
            assert_eq!(classifier.pointer().idle_count(), 0);
        }
    }
}
