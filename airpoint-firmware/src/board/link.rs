//! Radio link bridges
//!
//! Implement the core HID, transport and channel traits on top of the
//! static link channels. Every call is non-blocking: outbound messages are
//! queued for `link_tx_task` and dropped when the queue is full.

use core::sync::atomic::Ordering;
use defmt::*;

use airpoint_core::traits::{DebugChannel, HidSink, MouseButton, Transport};
use airpoint_protocol::link::{ChannelBytes, DeviceMessage};

use crate::channels::{CHANNEL_INBOX, LINK_CONNECTED, LINK_TX};

fn send(message: DeviceMessage) {
    if LINK_TX.try_send(message).is_err() {
        warn!("Link TX queue full, dropping message");
    }
}

/// HID reports forwarded to the radio
#[derive(Default)]
pub struct LinkHid {
    buttons: u8,
}

impl LinkHid {
    pub const fn new() -> Self {
        Self { buttons: 0 }
    }

    fn set_buttons(&mut self, buttons: u8) {
        if buttons != self.buttons {
            self.buttons = buttons;
            send(DeviceMessage::Buttons(buttons));
        }
    }
}

impl HidSink for LinkHid {
    fn move_pointer(&mut self, dx: i16, dy: i16, wheel: i8) {
        send(DeviceMessage::PointerMove { dx, dy, wheel });
    }

    fn press_button(&mut self, button: MouseButton) {
        self.set_buttons(self.buttons | button.mask());
    }

    fn release_button(&mut self, button: MouseButton) {
        self.set_buttons(self.buttons & !button.mask());
    }

    fn press_key(&mut self, code: u8) {
        send(DeviceMessage::KeyDown(code));
    }

    fn release_key(&mut self, code: u8) {
        send(DeviceMessage::KeyUp(code));
    }
}

/// Host connection managed by the radio
#[derive(Default)]
pub struct LinkTransport;

impl Transport for LinkTransport {
    fn is_connected(&self) -> bool {
        LINK_CONNECTED.load(Ordering::Acquire)
    }

    fn begin_advertising(&mut self) {
        send(DeviceMessage::Advertise);
    }

    fn disconnect_all(&mut self) {
        // Reported back through LinkStatus once the radio has dropped them
        send(DeviceMessage::DisconnectAll);
    }
}

/// Configuration characteristic relayed by the radio
#[derive(Default)]
pub struct LinkChannel {
    value: ChannelBytes,
}

impl LinkChannel {
    pub const fn new() -> Self {
        Self {
            value: ChannelBytes::new(),
        }
    }
}

impl DebugChannel for LinkChannel {
    fn write_chunk(&mut self, bytes: &[u8]) {
        let fit = bytes.len().min(self.value.capacity());
        if fit < bytes.len() {
            warn!("Channel value of {} bytes truncated", bytes.len());
        }
        self.value.clear();
        // fit <= capacity
        let _ = self.value.extend_from_slice(&bytes[..fit]);
        send(DeviceMessage::ChannelValue(self.value.clone()));
    }

    fn read_chunk(&mut self, buf: &mut [u8]) -> usize {
        let len = self.value.len().min(buf.len());
        buf[..len].copy_from_slice(&self.value[..len]);
        len
    }

    fn take_notification(&mut self) -> bool {
        match CHANNEL_INBOX.try_take() {
            Some(bytes) => {
                self.value = bytes;
                true
            }
            None => false,
        }
    }
}
