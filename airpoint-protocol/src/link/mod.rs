//! UART link to the radio co-processor

pub mod frame;
pub mod messages;

pub use frame::{Frame, FrameError, FrameParser, FRAME_START, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE};
pub use messages::{ChannelBytes, DeviceMessage, RadioMessage};
