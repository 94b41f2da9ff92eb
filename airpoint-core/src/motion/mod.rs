//! Motion pipeline
//!
//! Samples are buffered in a fixed window and classified into pointer
//! deltas and discrete gestures.

pub mod classifier;
pub mod gesture;
pub mod pointer;
pub mod sample;
pub mod window;

pub use classifier::{Classification, MotionClassifier};
pub use gesture::{GestureDetector, WindowStats};
pub use pointer::{PointerOutput, PointerTracker};
pub use sample::Sample;
pub use window::{SampleWindow, WindowValue};

/// Samples held for gesture detection
pub const WINDOW_LEN: usize = 8;
