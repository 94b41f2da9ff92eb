//! Hardware abstraction traits
//!
//! These traits define the interface between the motion pipeline and the
//! board: sensors, HID output, the wireless link and storage.

pub mod battery;
pub mod hid;
pub mod persistence;
pub mod sensor;
pub mod transport;

pub use battery::{BatteryError, BatteryReading, BatterySensor};
pub use hid::{keys, HidSink, MouseButton};
pub use persistence::{ConfigPersistence, PersistenceError, SaveProgress};
pub use sensor::{MotionSensor, SensorError};
pub use transport::{DebugChannel, Transport};
