//! Flash storage task
//!
//! Owns the flash peripheral after boot and performs configuration writes
//! requested by the supervisor.

use defmt::*;

use airpoint_core::traits::PersistenceError;

use crate::channels::{SAVE_REQUEST, SAVE_RESULT};
use crate::config::flash::FlashError;
use crate::config::{FlashStorage, StorageKey};

#[embassy_executor::task]
pub async fn storage_task(mut storage: FlashStorage<'static>) {
    info!("Storage task started");

    loop {
        let json = SAVE_REQUEST.wait().await;

        let result = storage
            .write(StorageKey::ConfigJson, json.as_bytes())
            .await
            .map_err(|e| match e {
                FlashError::BufferTooSmall => PersistenceError::TooLarge,
                FlashError::Storage | FlashError::NotFound => PersistenceError::Storage,
            });

        match result {
            Ok(()) => info!("Configuration saved ({} bytes)", json.len()),
            Err(e) => warn!("Configuration save failed: {:?}", e),
        }
        SAVE_RESULT.signal(result);
    }
}
