//! HID output sink

/// Keyboard usage IDs (HID usage page 0x07)
pub mod keys {
    pub const ENTER: u8 = 0x28;
    pub const ESCAPE: u8 = 0x29;
    pub const TAB: u8 = 0x2B;
    pub const RIGHT_ARROW: u8 = 0x4F;
    pub const LEFT_ARROW: u8 = 0x50;
    pub const DOWN_ARROW: u8 = 0x51;
    pub const UP_ARROW: u8 = 0x52;
}

/// Mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    /// Bit in the HID button mask
    pub const fn mask(self) -> u8 {
        match self {
            MouseButton::Left => 0x01,
            MouseButton::Right => 0x02,
            MouseButton::Middle => 0x04,
        }
    }
}

/// Trait for the HID report sink
///
/// All calls are fire-and-forget. While no host is connected the
/// implementation may queue or drop reports.
pub trait HidSink {
    /// Relative pointer motion plus wheel
    fn move_pointer(&mut self, dx: i16, dy: i16, wheel: i8);

    fn press_button(&mut self, button: MouseButton);

    fn release_button(&mut self, button: MouseButton);

    /// Press a keyboard usage
    fn press_key(&mut self, code: u8);

    /// Release a keyboard usage
    fn release_key(&mut self, code: u8);
}
