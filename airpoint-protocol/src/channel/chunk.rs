//! Chunking rules for the bounded channel value
//!
//! The channel holds at most [`CHUNK_CAPACITY`] bytes, so payloads travel as
//! a sequence of chunks. Sentinels are short words, which makes length the
//! tie-breaker: a full chunk is always data, and a short final chunk that
//! happens to spell a reserved word is split in two so that neither half
//! can be mistaken for protocol state.

use super::sentinel::is_reserved;

/// Maximum bytes in one channel value
pub const CHUNK_CAPACITY: usize = 512;

/// Maximum accumulated payload size
pub const MAX_PAYLOAD_LEN: usize = 4096;

/// Length of the next chunk to cut from `remaining`
pub fn next_chunk_len(remaining: &[u8]) -> usize {
    if remaining.len() >= CHUNK_CAPACITY {
        return CHUNK_CAPACITY;
    }
    if is_reserved(remaining) {
        // Every reserved word is at least two bytes long
        return remaining.len() - 1;
    }
    remaining.len()
}

/// Splits a payload into channel-sized chunks
///
/// A payload of `k * CHUNK_CAPACITY` bytes yields exactly `k` chunks; an
/// empty payload yields none.
#[derive(Debug, Clone)]
pub struct ChunkSplitter<'a> {
    remaining: &'a [u8],
}

impl<'a> ChunkSplitter<'a> {
    /// Create a splitter over a payload
    pub fn new(payload: &'a [u8]) -> Self {
        Self { remaining: payload }
    }

    /// Bytes not yet yielded
    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }
}

impl<'a> Iterator for ChunkSplitter<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining.is_empty() {
            return None;
        }
        let len = next_chunk_len(self.remaining);
        let (chunk, rest) = self.remaining.split_at(len);
        self.remaining = rest;
        Some(chunk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_payload_is_one_chunk() {
        let mut splitter = ChunkSplitter::new(b"{\"a\":1}");
        assert_eq!(splitter.next(), Some(&b"{\"a\":1}"[..]));
        assert_eq!(splitter.next(), None);
    }

    #[test]
    fn test_exact_multiple_has_no_trailer() {
        let payload = [b'x'; CHUNK_CAPACITY * 2];
        let chunks: heapless::Vec<&[u8], 4> = ChunkSplitter::new(&payload).collect();
        assert_eq!(chunks.len(), 2);
        assert!(chunks.iter().all(|c| c.len() == CHUNK_CAPACITY));
    }

    #[test]
    fn test_reserved_tail_is_split() {
        let mut payload = [b'x'; CHUNK_CAPACITY + 8];
        payload[CHUNK_CAPACITY..].copy_from_slice(b"Complete");

        let mut splitter = ChunkSplitter::new(&payload);
        assert_eq!(splitter.next().map(|c| c.len()), Some(CHUNK_CAPACITY));
        assert_eq!(splitter.next(), Some(&b"Complet"[..]));
        assert_eq!(splitter.next(), Some(&b"e"[..]));
        assert_eq!(splitter.next(), None);
    }

    #[test]
    fn test_full_chunk_is_data_even_when_it_looks_like_text() {
        assert_eq!(next_chunk_len(&[b'N'; CHUNK_CAPACITY]), CHUNK_CAPACITY);
        assert_eq!(next_chunk_len(b"Next"), 3);
        assert_eq!(next_chunk_len(b"Nexus"), 5);
    }

    #[test]
    fn test_empty_payload() {
        assert_eq!(ChunkSplitter::new(b"").next(), None);
    }
}
