//! Operating modes and classified gesture events

/// Device operating mode
///
/// Exactly one mode is active; only dispatch actions change it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OperatingMode {
    /// Gestures only switch modes
    #[default]
    Idle,
    /// Pointer motion plus mouse buttons and wheel
    MouseButtons,
    /// Arrow keys, Enter and Tab
    Keyboard,
}

impl OperatingMode {
    pub const COUNT: usize = 3;

    pub const ALL: [OperatingMode; Self::COUNT] = [
        OperatingMode::Idle,
        OperatingMode::MouseButtons,
        OperatingMode::Keyboard,
    ];

    /// Column in the dispatch table
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Discrete gesture classified from a sample window
///
/// At most one per cycle; `None` is the idle value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GestureEvent {
    #[default]
    None,
    Up,
    Down,
    Left,
    Right,
    RollRight,
    RollLeft,
    ShakeYes,
    ShakeNo,
}

impl GestureEvent {
    pub const COUNT: usize = 9;

    pub const ALL: [GestureEvent; Self::COUNT] = [
        GestureEvent::None,
        GestureEvent::Up,
        GestureEvent::Down,
        GestureEvent::Left,
        GestureEvent::Right,
        GestureEvent::RollRight,
        GestureEvent::RollLeft,
        GestureEvent::ShakeYes,
        GestureEvent::ShakeNo,
    ];

    /// Row in the dispatch table
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Check if this is a shake gesture
    pub fn is_shake(&self) -> bool {
        matches!(self, GestureEvent::ShakeYes | GestureEvent::ShakeNo)
    }

    /// Check if this is a roll gesture
    pub fn is_roll(&self) -> bool {
        matches!(self, GestureEvent::RollRight | GestureEvent::RollLeft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_match_all() {
        for (i, event) in GestureEvent::ALL.iter().enumerate() {
            assert_eq!(event.index(), i);
        }
        for (i, mode) in OperatingMode::ALL.iter().enumerate() {
            assert_eq!(mode.index(), i);
        }
    }

    #[test]
    fn test_categories() {
        assert!(GestureEvent::ShakeNo.is_shake());
        assert!(GestureEvent::RollLeft.is_roll());
        assert!(!GestureEvent::Up.is_roll());
        assert_eq!(GestureEvent::default(), GestureEvent::None);
        assert_eq!(OperatingMode::default(), OperatingMode::Idle);
    }
}
