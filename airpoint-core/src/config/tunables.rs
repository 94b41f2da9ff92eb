//! Known tunables
//!
//! Every tunable has a dotted path into the store, a compiled-in default and
//! an accepted range. Readers take one [`Tunables`] snapshot at the start of
//! each cycle, so a value rewritten by the channel mid-cycle is picked up on
//! the next cycle.

use super::store::StateStore;
use super::value::ConfigValue;

/// Static description of one tunable
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TunableSpec {
    pub path: &'static str,
    pub default: f64,
    pub min: f64,
    pub max: f64,
}

impl TunableSpec {
    const fn new(path: &'static str, default: f64, min: f64, max: f64) -> Self {
        Self {
            path,
            default,
            min,
            max,
        }
    }

    /// Check if a value is accepted
    pub fn accepts(&self, value: f64) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }

    /// Default as a store value; whole defaults serialise as JSON integers
    pub fn default_value(&self) -> ConfigValue {
        if libm::trunc(self.default) == self.default {
            return ConfigValue::from(self.default as i64);
        }
        ConfigValue::float(self.default).unwrap_or(ConfigValue::from(0i64))
    }
}

pub const POINTER_SENSITIVITY: &str = "pointer.sensitivity";
pub const POINTER_IDLE_THRESHOLD: &str = "pointer.idle_threshold";
pub const POINTER_SLOW_THRESHOLD: &str = "pointer.slow_threshold";
pub const POINTER_FAST_THRESHOLD: &str = "pointer.fast_threshold";
pub const POINTER_SLOW_SCALE: &str = "pointer.slow_scale";
pub const POINTER_MID_SCALE: &str = "pointer.mid_scale";
pub const POINTER_FAST_SCALE: &str = "pointer.fast_scale";
pub const POINTER_SETTLE_CYCLES: &str = "pointer.settle_cycles";
pub const GESTURE_FLICK_THRESHOLD: &str = "gesture.flick_threshold";
pub const GESTURE_ROLL_THRESHOLD: &str = "gesture.roll_threshold";
pub const GESTURE_SHAKE_THRESHOLD: &str = "gesture.shake_threshold";
pub const GESTURE_SHAKE_REVERSALS: &str = "gesture.shake_reversals";
pub const MOUSE_SCROLL_STEP: &str = "mouse.scroll_step";
pub const SAMPLING_PERIOD_MS: &str = "sampling.period_ms";
pub const WATCHDOG_TIMEOUT_S: &str = "watchdog.timeout_s";
pub const BATTERY_INTERVAL_MS: &str = "battery.interval_ms";

/// Table of every known tunable
pub const TUNABLES: [TunableSpec; 16] = [
    TunableSpec::new(POINTER_SENSITIVITY, 1.0, 0.01, 100.0),
    TunableSpec::new(POINTER_IDLE_THRESHOLD, 0.25, 0.0, 100.0),
    TunableSpec::new(POINTER_SLOW_THRESHOLD, 1.8, 0.0, 100.0),
    TunableSpec::new(POINTER_FAST_THRESHOLD, 5.0, 0.0, 100.0),
    TunableSpec::new(POINTER_SLOW_SCALE, 1.0, 0.0, 50.0),
    TunableSpec::new(POINTER_MID_SCALE, 2.5, 0.0, 50.0),
    TunableSpec::new(POINTER_FAST_SCALE, 4.0, 0.0, 50.0),
    TunableSpec::new(POINTER_SETTLE_CYCLES, 40.0, 1.0, 10_000.0),
    TunableSpec::new(GESTURE_FLICK_THRESHOLD, 4.0, 0.01, 100.0),
    TunableSpec::new(GESTURE_ROLL_THRESHOLD, 3.0, 0.01, 100.0),
    TunableSpec::new(GESTURE_SHAKE_THRESHOLD, 2.5, 0.01, 100.0),
    TunableSpec::new(GESTURE_SHAKE_REVERSALS, 3.0, 1.0, 31.0),
    TunableSpec::new(MOUSE_SCROLL_STEP, 1.0, 1.0, 127.0),
    TunableSpec::new(SAMPLING_PERIOD_MS, 12.0, 5.0, 100.0),
    TunableSpec::new(WATCHDOG_TIMEOUT_S, 180.0, 5.0, 86_400.0),
    TunableSpec::new(BATTERY_INTERVAL_MS, 10_000.0, 1_000.0, 600_000.0),
];

/// Look up a tunable by path
pub fn spec_for(path: &str) -> Option<&'static TunableSpec> {
    TUNABLES.iter().find(|spec| spec.path == path)
}

/// Pointer speed banding parameters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PointerTunables {
    pub sensitivity: f32,
    pub idle_threshold: f32,
    pub slow_threshold: f32,
    pub fast_threshold: f32,
    pub slow_scale: f32,
    pub mid_scale: f32,
    pub fast_scale: f32,
    pub settle_cycles: u32,
}

/// Gesture detection parameters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GestureTunables {
    pub flick_threshold: f32,
    pub roll_threshold: f32,
    pub shake_threshold: f32,
    pub shake_reversals: u8,
}

/// One cycle's view of the configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tunables {
    pub pointer: PointerTunables,
    pub gesture: GestureTunables,
    pub scroll_step: i8,
    pub sampling_period_ms: u32,
    pub watchdog_timeout_s: u32,
    pub battery_interval_ms: u32,
}

impl Default for Tunables {
    fn default() -> Self {
        Self::from_store(&StateStore::new())
    }
}

impl Tunables {
    /// Read every tunable, falling back to defaults for missing or invalid values
    pub fn from_store(store: &StateStore) -> Self {
        let read = |path: &str| -> f32 {
            let Some(spec) = spec_for(path) else {
                return 0.0;
            };
            match store.number(path) {
                Some(v) if spec.accepts(v) => v as f32,
                _ => spec.default as f32,
            }
        };

        Self {
            pointer: PointerTunables {
                sensitivity: read(POINTER_SENSITIVITY),
                idle_threshold: read(POINTER_IDLE_THRESHOLD),
                slow_threshold: read(POINTER_SLOW_THRESHOLD),
                fast_threshold: read(POINTER_FAST_THRESHOLD),
                slow_scale: read(POINTER_SLOW_SCALE),
                mid_scale: read(POINTER_MID_SCALE),
                fast_scale: read(POINTER_FAST_SCALE),
                settle_cycles: read(POINTER_SETTLE_CYCLES) as u32,
            },
            gesture: GestureTunables {
                flick_threshold: read(GESTURE_FLICK_THRESHOLD),
                roll_threshold: read(GESTURE_ROLL_THRESHOLD),
                shake_threshold: read(GESTURE_SHAKE_THRESHOLD),
                shake_reversals: read(GESTURE_SHAKE_REVERSALS) as u8,
            },
            scroll_step: read(MOUSE_SCROLL_STEP) as i8,
            sampling_period_ms: read(SAMPLING_PERIOD_MS) as u32,
            watchdog_timeout_s: read(WATCHDOG_TIMEOUT_S) as u32,
            battery_interval_ms: read(BATTERY_INTERVAL_MS) as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigValue;

    #[test]
    fn test_defaults_are_in_range() {
        for spec in TUNABLES.iter() {
            assert!(spec.accepts(spec.default), "{}", spec.path);
        }
    }

    #[test]
    fn test_defaults() {
        let t = Tunables::default();
        assert_eq!(t.pointer.slow_threshold, 1.8);
        assert_eq!(t.pointer.fast_threshold, 5.0);
        assert_eq!(t.pointer.mid_scale, 2.5);
        assert_eq!(t.pointer.settle_cycles, 40);
        assert_eq!(t.gesture.shake_reversals, 3);
        assert_eq!(t.sampling_period_ms, 12);
        assert_eq!(t.watchdog_timeout_s, 180);
    }

    #[test]
    fn test_store_values_override_defaults() {
        let mut store = StateStore::new();
        store.set(WATCHDOG_TIMEOUT_S, ConfigValue::from(20u64)).unwrap();
        store.set(MOUSE_SCROLL_STEP, ConfigValue::from(3u64)).unwrap();

        let t = Tunables::from_store(&store);
        assert_eq!(t.watchdog_timeout_s, 20);
        assert_eq!(t.scroll_step, 3);
    }

    #[test]
    fn test_default_values_keep_integers() {
        let timeout = spec_for(WATCHDOG_TIMEOUT_S).unwrap().default_value();
        assert_eq!(timeout, ConfigValue::from(180i64));
        assert_eq!(serde_json::to_string(&timeout).unwrap(), "180");

        let mid = spec_for(POINTER_MID_SCALE).unwrap().default_value();
        assert_eq!(serde_json::to_string(&mid).unwrap(), "2.5");
    }

    #[test]
    fn test_unknown_path_has_no_spec() {
        assert!(spec_for("pointer.colour").is_none());
        assert!(spec_for(POINTER_MID_SCALE).is_some());
    }
}
