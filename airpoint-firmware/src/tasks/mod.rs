//! Embassy async tasks
//!
//! The supervisor task runs the whole motion pipeline; the rest move bytes
//! between it and the hardware through channels/signals.

pub mod link_rx;
pub mod link_tx;
pub mod reboot;
pub mod storage;
pub mod supervisor;

pub use link_rx::link_rx_task;
pub use link_tx::link_tx_task;
pub use reboot::reboot_task;
pub use storage::storage_task;
pub use supervisor::{supervisor_task, BoardBattery, BoardImu};
