//! Configuration error types

use alloc::format;
use alloc::string::String;

/// Reasons a key or value is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyError {
    /// Zero-length key segment
    Empty,
    /// Key segment longer than [`crate::config::MAX_KEY_LEN`] bytes
    TooLong,
    /// Key segment contains the path separator
    ContainsDot,
    /// Known tunable given a non-numeric value
    NotANumber,
    /// Known tunable outside its accepted range
    OutOfRange,
    /// Number with no finite value
    NotFinite,
}

impl KeyError {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyError::Empty => "empty key",
            KeyError::TooLong => "key too long",
            KeyError::ContainsDot => "key contains '.'",
            KeyError::NotANumber => "expected number",
            KeyError::OutOfRange => "out of range",
            KeyError::NotFinite => "not finite",
        }
    }
}

/// Errors from parsing or merging a configuration document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Payload is not valid UTF-8
    NotUtf8,
    /// Payload is not valid JSON
    BadJson,
    /// Valid JSON that is not an object of supported values
    WrongShape,
    /// A leaf failed validation; leaves merged before it stay applied
    InvalidKey { path: String, reason: KeyError },
}

impl ConfigError {
    /// Error kind as reported on the channel
    pub fn kind(&self) -> &'static str {
        match self {
            ConfigError::NotUtf8 | ConfigError::BadJson | ConfigError::WrongShape => {
                "malformed payload"
            }
            ConfigError::InvalidKey { .. } => "invalid key",
        }
    }

    /// Human-readable detail for the channel report
    pub fn detail(&self) -> String {
        match self {
            ConfigError::NotUtf8 => String::from("not utf-8"),
            ConfigError::BadJson => String::from("bad json"),
            ConfigError::WrongShape => String::from("expected object of bool, number, text or map"),
            ConfigError::InvalidKey { path, reason } => format!("{} ({})", path, reason.as_str()),
        }
    }

    pub fn is_malformed(&self) -> bool {
        !matches!(self, ConfigError::InvalidKey { .. })
    }
}
