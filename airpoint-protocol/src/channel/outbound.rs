//! Device-to-host streaming
//!
//! Holds a copy of the text being sent and hands it out one chunk at a time,
//! using the same cutting rules as the host. The driver writes a chunk, waits
//! for the host's `Next`, and writes `Complete` once the stream is drained.

use heapless::Vec;

use super::chunk::{next_chunk_len, MAX_PAYLOAD_LEN};
use super::session::ProtocolError;

/// Buffered outbound payload
#[derive(Debug, Clone, Default)]
pub struct OutboundStream {
    buffer: Vec<u8, MAX_PAYLOAD_LEN>,
    offset: usize,
}

impl OutboundStream {
    /// Create an empty stream
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            offset: 0,
        }
    }

    /// Replace the stream content
    pub fn load(&mut self, payload: &[u8]) -> Result<(), ProtocolError> {
        self.buffer.clear();
        self.offset = 0;
        self.buffer
            .extend_from_slice(payload)
            .map_err(|_| ProtocolError::StreamTooLarge)
    }

    /// Take the next chunk, or `None` when drained
    pub fn next_chunk(&mut self) -> Option<&[u8]> {
        let remaining = &self.buffer[self.offset..];
        if remaining.is_empty() {
            return None;
        }
        let start = self.offset;
        self.offset += next_chunk_len(remaining);
        Some(&self.buffer[start..self.offset])
    }

    /// Check if every chunk has been handed out
    pub fn is_drained(&self) -> bool {
        self.offset >= self.buffer.len()
    }

    /// Drop any buffered content
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.offset = 0;
    }
}
