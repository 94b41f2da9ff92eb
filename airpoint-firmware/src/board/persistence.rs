//! Flash persistence bridge
//!
//! Hands serialised documents to `storage_task` and polls for the result,
//! so a flash write never blocks the supervisor.

use alloc::string::ToString;
use defmt::*;

use airpoint_core::traits::{ConfigPersistence, PersistenceError, SaveProgress};

use crate::channels::{REBOOT, SAVE_REQUEST, SAVE_RESULT};
use crate::config::MAX_CONFIG_SIZE;

/// Configuration saved through the storage task
#[derive(Default)]
pub struct FlashPersistence {
    pending: bool,
}

impl FlashPersistence {
    pub const fn new() -> Self {
        Self { pending: false }
    }
}

impl ConfigPersistence for FlashPersistence {
    fn save_config(&mut self, json: &str) -> Result<(), PersistenceError> {
        if self.pending {
            return Err(PersistenceError::Busy);
        }
        if json.len() > MAX_CONFIG_SIZE {
            return Err(PersistenceError::TooLarge);
        }

        // Drop any stale result before the new request is visible
        SAVE_RESULT.reset();
        SAVE_REQUEST.signal(json.to_string());
        self.pending = true;
        debug!("Save of {} bytes requested", json.len());
        Ok(())
    }

    fn poll_save(&mut self) -> SaveProgress {
        if !self.pending {
            return SaveProgress::Done(Ok(()));
        }
        match SAVE_RESULT.try_take() {
            Some(result) => {
                self.pending = false;
                SaveProgress::Done(result)
            }
            None => SaveProgress::Pending,
        }
    }

    fn reboot(&mut self) {
        info!("Reboot requested");
        REBOOT.signal(());
    }
}
