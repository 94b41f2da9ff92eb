//! Persistent configuration storage trait

/// Errors that can occur saving configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PersistenceError {
    /// Serialised document does not fit the storage partition
    TooLarge,
    /// Flash erase or program failed
    Storage,
    /// A save is already running
    Busy,
}

impl PersistenceError {
    pub fn as_str(&self) -> &'static str {
        match self {
            PersistenceError::TooLarge => "document too large",
            PersistenceError::Storage => "storage failure",
            PersistenceError::Busy => "save in progress",
        }
    }
}

/// Progress of a save started with [`ConfigPersistence::save_config`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SaveProgress {
    /// Write still running
    Pending,
    /// Write finished
    Done(Result<(), PersistenceError>),
}

/// Trait for persistent configuration storage
///
/// Saving is split into a start call and a poll so a slow flash write does
/// not stall the cooperative loop.
pub trait ConfigPersistence {
    /// Start writing a serialised configuration document
    fn save_config(&mut self, json: &str) -> Result<(), PersistenceError>;

    /// Poll the save started last
    fn poll_save(&mut self) -> SaveProgress;

    /// Restart the device; may not return
    fn reboot(&mut self);
}
