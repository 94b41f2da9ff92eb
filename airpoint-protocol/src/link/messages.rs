//! Message types for the radio link
//!
//! Message types are divided into two categories:
//! - Device → Radio: HID reports, transport control, channel values
//! - Radio → Device: link status, host channel writes, heartbeat responses

use heapless::Vec;

use super::frame::{Frame, FrameError};
use crate::channel::CHUNK_CAPACITY;

// Message type IDs: Device → Radio
pub const MSG_POINTER_MOVE: u8 = 0x10;
pub const MSG_BUTTONS: u8 = 0x11;
pub const MSG_KEY_DOWN: u8 = 0x12;
pub const MSG_KEY_UP: u8 = 0x13;
pub const MSG_ADVERTISE: u8 = 0x14;
pub const MSG_DISCONNECT_ALL: u8 = 0x15;
pub const MSG_CHANNEL_VALUE: u8 = 0x16;
pub const MSG_PING: u8 = 0x17;

// Message type IDs: Radio → Device
pub const MSG_LINK_STATUS: u8 = 0x80;
pub const MSG_CHANNEL_WRITTEN: u8 = 0x81;
pub const MSG_PONG: u8 = 0x82;

/// Bytes of one channel value
pub type ChannelBytes = Vec<u8, CHUNK_CAPACITY>;

/// Messages from the device to the radio co-processor
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceMessage {
    /// Relative pointer report
    PointerMove { dx: i16, dy: i16, wheel: i8 },
    /// Current mouse button mask (bit 0 left, bit 1 right, bit 2 middle)
    Buttons(u8),
    /// Keyboard usage pressed
    KeyDown(u8),
    /// Keyboard usage released
    KeyUp(u8),
    /// Start advertising to hosts
    Advertise,
    /// Drop every host link
    DisconnectAll,
    /// New value for the shared configuration characteristic
    ChannelValue(ChannelBytes),
    /// Heartbeat request
    Ping,
}

impl DeviceMessage {
    /// Encode this message into a frame
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            DeviceMessage::PointerMove { dx, dy, wheel } => {
                let [dx0, dx1] = dx.to_le_bytes();
                let [dy0, dy1] = dy.to_le_bytes();
                Frame::new(MSG_POINTER_MOVE, &[dx0, dx1, dy0, dy1, *wheel as u8])
            }
            DeviceMessage::Buttons(mask) => Frame::new(MSG_BUTTONS, &[*mask]),
            DeviceMessage::KeyDown(code) => Frame::new(MSG_KEY_DOWN, &[*code]),
            DeviceMessage::KeyUp(code) => Frame::new(MSG_KEY_UP, &[*code]),
            DeviceMessage::Advertise => Ok(Frame::empty(MSG_ADVERTISE)),
            DeviceMessage::DisconnectAll => Ok(Frame::empty(MSG_DISCONNECT_ALL)),
            DeviceMessage::ChannelValue(bytes) => Frame::new(MSG_CHANNEL_VALUE, bytes),
            DeviceMessage::Ping => Ok(Frame::empty(MSG_PING)),
        }
    }

    /// Parse a message from a frame (for testing or simulation)
    pub fn from_frame(frame: &Frame) -> Result<Self, FrameError> {
        let payload = frame.payload.as_slice();
        match frame.msg_type {
            MSG_POINTER_MOVE => match payload {
                [dx0, dx1, dy0, dy1, wheel] => Ok(DeviceMessage::PointerMove {
                    dx: i16::from_le_bytes([*dx0, *dx1]),
                    dy: i16::from_le_bytes([*dy0, *dy1]),
                    wheel: *wheel as i8,
                }),
                _ => Err(FrameError::InvalidFrame),
            },
            MSG_BUTTONS => first_byte(payload).map(DeviceMessage::Buttons),
            MSG_KEY_DOWN => first_byte(payload).map(DeviceMessage::KeyDown),
            MSG_KEY_UP => first_byte(payload).map(DeviceMessage::KeyUp),
            MSG_ADVERTISE => Ok(DeviceMessage::Advertise),
            MSG_DISCONNECT_ALL => Ok(DeviceMessage::DisconnectAll),
            MSG_CHANNEL_VALUE => channel_bytes(payload).map(DeviceMessage::ChannelValue),
            MSG_PING => Ok(DeviceMessage::Ping),
            _ => Err(FrameError::InvalidFrame),
        }
    }
}

/// Messages from the radio co-processor to the device
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RadioMessage {
    /// Host link state changed
    LinkStatus { connected: bool },
    /// A host wrote the configuration characteristic
    ChannelWritten(ChannelBytes),
    /// Heartbeat response
    Pong,
}

impl RadioMessage {
    /// Parse a message from a frame
    pub fn from_frame(frame: &Frame) -> Result<Self, FrameError> {
        let payload = frame.payload.as_slice();
        match frame.msg_type {
            MSG_LINK_STATUS => first_byte(payload).map(|b| RadioMessage::LinkStatus {
                connected: b != 0,
            }),
            MSG_CHANNEL_WRITTEN => channel_bytes(payload).map(RadioMessage::ChannelWritten),
            MSG_PONG => Ok(RadioMessage::Pong),
            _ => Err(FrameError::InvalidFrame),
        }
    }

    /// Encode this message into a frame (for testing or simulation)
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            RadioMessage::LinkStatus { connected } => {
                Frame::new(MSG_LINK_STATUS, &[*connected as u8])
            }
            RadioMessage::ChannelWritten(bytes) => Frame::new(MSG_CHANNEL_WRITTEN, bytes),
            RadioMessage::Pong => Ok(Frame::empty(MSG_PONG)),
        }
    }
}

fn first_byte(payload: &[u8]) -> Result<u8, FrameError> {
    payload.first().copied().ok_or(FrameError::InvalidFrame)
}

fn channel_bytes(payload: &[u8]) -> Result<ChannelBytes, FrameError> {
    Vec::from_slice(payload).map_err(|_| FrameError::PayloadTooLarge)
}
