//! Chunked text protocol over a single bounded value
//!
//! Host and device share one read/write value of at most [`CHUNK_CAPACITY`]
//! bytes. Upload of a configuration document:
//!
//! ```text
//! host                      device
//!  │ "Update" ───────────────▶ │
//!  │ ◀─────────────── "Ready"  │
//!  │ chunk 1 ────────────────▶ │
//!  │ ◀──────────────── "Next"  │
//!  │ ...                       │
//!  │ "Complete" ─────────────▶ │
//!  │ ◀──────────── "Complete"  │  (or "Error: ...")
//! ```

pub mod chunk;
pub mod outbound;
pub mod sentinel;
pub mod session;

pub use chunk::{next_chunk_len, ChunkSplitter, CHUNK_CAPACITY, MAX_PAYLOAD_LEN};
pub use outbound::OutboundStream;
pub use sentinel::{error_report, is_reserved, Command, Sentinel, ERROR_PREFIX};
pub use session::{ChannelSession, ProtocolError, Reaction, SessionState};
