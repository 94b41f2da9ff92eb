//! Flash-backed configuration

pub mod flash;
pub mod loader;

pub use flash::{FlashStorage, StorageKey, MAX_CONFIG_SIZE};
pub use loader::load_store;
