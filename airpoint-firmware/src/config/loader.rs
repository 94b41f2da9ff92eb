//! Configuration persistence
//!
//! Loads the configuration store from flash at boot. The stored JSON
//! document is merged over the compiled-in defaults; a missing or corrupt
//! record leaves the defaults alone.

use core::str;
use defmt::*;

use airpoint_core::config::StateStore;
use airpoint_core::error::ConfigError;

use super::flash::{FlashError, FlashStorage, StorageKey, MAX_CONFIG_SIZE};

/// Configuration loading errors
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigLoadError {
    /// Flash operation failed
    Flash(FlashError),
    /// Invalid UTF-8 in stored document
    InvalidUtf8,
    /// Stored document rejected by the store
    Parse,
}

impl From<FlashError> for ConfigLoadError {
    fn from(e: FlashError) -> Self {
        ConfigLoadError::Flash(e)
    }
}

impl From<ConfigError> for ConfigLoadError {
    fn from(_: ConfigError) -> Self {
        ConfigLoadError::Parse
    }
}

/// Build the boot-time store
pub async fn load_store(storage: &mut FlashStorage<'_>) -> StateStore {
    info!("Loading configuration from flash...");

    match load_saved(storage).await {
        Ok(store) => {
            info!("Loaded {} configuration entries", store.len());
            store
        }
        Err(ConfigLoadError::Flash(FlashError::NotFound)) => {
            info!("No configuration in flash, using defaults");
            StateStore::with_defaults()
        }
        Err(e) => {
            warn!("Stored configuration unusable: {:?}, using defaults", e);
            StateStore::with_defaults()
        }
    }
}

/// Read the stored document and merge it over the defaults
async fn load_saved(storage: &mut FlashStorage<'_>) -> Result<StateStore, ConfigLoadError> {
    let mut buffer = [0u8; MAX_CONFIG_SIZE];
    let len = storage.read(StorageKey::ConfigJson, &mut buffer).await?;
    debug!("Read {} bytes of JSON from flash", len);

    let text = str::from_utf8(&buffer[..len]).map_err(|_| ConfigLoadError::InvalidUtf8)?;

    let mut store = StateStore::with_defaults();
    store.merge_json(text)?;
    Ok(store)
}
