//! Runtime configuration
//!
//! A JSON-shaped store mutated over the configuration channel and read by
//! the motion pipeline once per cycle.

pub mod store;
pub mod tunables;
pub mod value;

pub use store::{payload_text, validate_entry, validate_key, StateStore, MAX_KEY_LEN};
pub use tunables::{spec_for, GestureTunables, PointerTunables, TunableSpec, Tunables, TUNABLES};
pub use value::{ConfigMap, ConfigValue};
