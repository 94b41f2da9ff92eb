//! Shared event flags
//!
//! The only channel between tasks. A flag set while nobody is waiting stays
//! set until a task clears or takes it. With a single-threaded cooperative
//! executor every operation is atomic with respect to yield points.

/// Event flags shared between tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Flag {
    /// A host is connected
    Connected,
    /// The link dropped after having been up
    ConnectionLost,
    /// Inactivity timeout expired
    SleepRequested,
    /// Motion or HID output since the watchdog last looked
    Activity,
    /// The sensor failed repeatedly and sampling stopped
    SensorFault,
    /// Battery below the low threshold
    BatteryLow,
}

impl Flag {
    pub const ALL: [Flag; 6] = [
        Flag::Connected,
        Flag::ConnectionLost,
        Flag::SleepRequested,
        Flag::Activity,
        Flag::SensorFault,
        Flag::BatteryLow,
    ];

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Bitset of [`Flag`]s
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SignalFlags {
    bits: u8,
}

impl SignalFlags {
    pub const fn new() -> Self {
        Self { bits: 0 }
    }

    pub fn set(&mut self, flag: Flag) {
        self.bits |= flag.bit();
    }

    pub fn clear(&mut self, flag: Flag) {
        self.bits &= !flag.bit();
    }

    pub fn is_set(&self, flag: Flag) -> bool {
        self.bits & flag.bit() != 0
    }

    /// Set or clear depending on `value`
    pub fn assign(&mut self, flag: Flag, value: bool) {
        if value {
            self.set(flag);
        } else {
            self.clear(flag);
        }
    }

    /// Test and clear
    pub fn take(&mut self, flag: Flag) -> bool {
        let was_set = self.is_set(flag);
        self.clear(flag);
        was_set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_are_independent() {
        let mut flags = SignalFlags::new();
        for flag in Flag::ALL {
            assert!(!flags.is_set(flag));
        }

        flags.set(Flag::Activity);
        flags.set(Flag::Connected);
        assert!(flags.is_set(Flag::Activity));
        assert!(!flags.is_set(Flag::SleepRequested));

        flags.clear(Flag::Connected);
        assert!(!flags.is_set(Flag::Connected));
        assert!(flags.is_set(Flag::Activity));
    }

    #[test]
    fn test_take_clears() {
        let mut flags = SignalFlags::new();
        assert!(!flags.take(Flag::Activity));
        flags.set(Flag::Activity);
        assert!(flags.take(Flag::Activity));
        assert!(!flags.take(Flag::Activity));
    }

    #[test]
    fn test_assign() {
        let mut flags = SignalFlags::new();
        flags.assign(Flag::BatteryLow, true);
        assert!(flags.is_set(Flag::BatteryLow));
        flags.assign(Flag::BatteryLow, false);
        assert!(!flags.is_set(Flag::BatteryLow));
    }
}
