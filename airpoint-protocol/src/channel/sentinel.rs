//! Sentinel and command vocabulary for the configuration channel
//!
//! Sentinels are reserved, case-sensitive words written to the shared channel
//! value to signal protocol state instead of payload content. Commands are the
//! words a host writes while the device is idle to start an exchange.

use heapless::String;

use super::chunk::CHUNK_CAPACITY;

/// Prefix of every error report written by the device
pub const ERROR_PREFIX: &str = "Error: ";

/// Protocol state sentinels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Sentinel {
    /// Device is ready to receive the first payload chunk
    Ready,
    /// Request for the following chunk (either direction)
    Next,
    /// Transfer or operation finished
    Complete,
    /// Configuration is being written to persistent storage
    Saving,
    /// Device is about to restart
    Rebooting,
}

impl Sentinel {
    /// All sentinels, in wire order
    pub const ALL: [Sentinel; 5] = [
        Sentinel::Ready,
        Sentinel::Next,
        Sentinel::Complete,
        Sentinel::Saving,
        Sentinel::Rebooting,
    ];

    /// Wire representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Sentinel::Ready => "Ready",
            Sentinel::Next => "Next",
            Sentinel::Complete => "Complete",
            Sentinel::Saving => "Saving",
            Sentinel::Rebooting => "Rebooting",
        }
    }

    /// Wire representation as bytes
    pub const fn as_bytes(&self) -> &'static [u8] {
        self.as_str().as_bytes()
    }

    /// Match a channel value against the sentinel words
    pub fn parse(value: &[u8]) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_bytes() == value)
    }
}

/// Commands a host can issue while the channel is idle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Merge a JSON document into the configuration
    Update,
    /// Replace the configuration with a JSON document
    Overwrite,
    /// Persist the configuration
    Save,
    /// Persist the configuration, then restart
    Reboot,
    /// Stream the configuration back to the host
    Dump,
}

impl Command {
    /// All commands
    pub const ALL: [Command; 5] = [
        Command::Update,
        Command::Overwrite,
        Command::Save,
        Command::Reboot,
        Command::Dump,
    ];

    /// Wire representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Command::Update => "Update",
            Command::Overwrite => "Overwrite",
            Command::Save => "Save",
            Command::Reboot => "Reboot",
            Command::Dump => "Dump",
        }
    }

    /// Match a channel value against the command keywords
    pub fn parse(value: &[u8]) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str().as_bytes() == value)
    }

    /// Check if this command receives a payload from the host
    pub fn takes_payload(&self) -> bool {
        matches!(self, Command::Update | Command::Overwrite)
    }

    /// Check if this command ends in a write to persistent storage
    pub fn persists(&self) -> bool {
        matches!(self, Command::Save | Command::Reboot)
    }
}

/// Check if a value spells any reserved word (sentinel or command)
pub fn is_reserved(value: &[u8]) -> bool {
    Sentinel::parse(value).is_some() || Command::parse(value).is_some()
}

/// Build the error report written to the channel
///
/// Format is `Error: <kind>` or `Error: <kind>: <detail>`, truncated to one chunk.
pub fn error_report(kind: &str, detail: Option<&str>) -> String<CHUNK_CAPACITY> {
    let mut out = String::new();
    let parts = [ERROR_PREFIX, kind];
    for part in parts {
        push_truncated(&mut out, part);
    }
    if let Some(detail) = detail {
        push_truncated(&mut out, ": ");
        push_truncated(&mut out, detail);
    }
    out
}

fn push_truncated(out: &mut String<CHUNK_CAPACITY>, text: &str) {
    for c in text.chars() {
        if out.push(c).is_err() {
            return;
        }
    }
}
