//! Host-facing session state machine
//!
//! Tracks one exchange on the configuration channel:
//!
//! ```text
//! Idle ──command──▶ AwaitingSentinel ──chunk──▶ Accumulating ──Complete──▶ Dispatching ──▶ Idle
//!   │                                                                          ▲
//!   ├──Save/Reboot────────────────────────────────────────────────────────────┘
//!   └──Dump──▶ Streaming ──Next…──▶ Idle
//! ```
//!
//! Malformed input moves the session to `Error`; the driver reports it and
//! calls [`ChannelSession::finish`], which always lands back in `Idle`.
//!
//! The session only interprets host writes. Writing replies to the channel,
//! parsing payloads and persisting configuration belong to the caller.

use heapless::Vec;

use super::chunk::{CHUNK_CAPACITY, MAX_PAYLOAD_LEN};
use super::sentinel::{Command, Sentinel};

/// Session states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionState {
    /// Waiting for a command keyword
    Idle,
    /// `Ready` written, waiting for the first chunk
    AwaitingSentinel,
    /// At least one chunk received
    Accumulating,
    /// Command handler running (payload parse, merge, save)
    Dispatching,
    /// Sending text to the host chunk by chunk
    Streaming,
    /// Malformed input seen, waiting to be reported
    Error,
}

/// Errors detected while receiving a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolError {
    /// A single write exceeded the channel capacity
    ChunkTooLarge,
    /// Accumulated payload exceeded [`MAX_PAYLOAD_LEN`]
    PayloadTooLarge,
    /// `Complete` arrived before any data
    EmptyPayload,
    /// Outbound text exceeded [`MAX_PAYLOAD_LEN`]
    StreamTooLarge,
}

impl ProtocolError {
    /// Short description used in error reports
    pub fn as_str(&self) -> &'static str {
        match self {
            ProtocolError::ChunkTooLarge => "chunk too large",
            ProtocolError::PayloadTooLarge => "payload too large",
            ProtocolError::EmptyPayload => "empty payload",
            ProtocolError::StreamTooLarge => "stream too large",
        }
    }
}

/// What the driver must do after a host write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reaction {
    /// Nothing to do (unknown word, echo of a sentinel, or busy)
    Ignore,
    /// A command opened a session
    Begin(Command),
    /// Chunk stored; write `Next` to request the following one
    RequestNext,
    /// Payload complete; run the command handler on [`ChannelSession::payload`]
    PayloadReady(Command),
    /// Host consumed the current outbound chunk
    SendNext,
    /// Malformed input; report it and call [`ChannelSession::finish`]
    Failed(ProtocolError),
}

/// Per-exchange protocol state
#[derive(Debug, Clone)]
pub struct ChannelSession {
    state: SessionState,
    command: Option<Command>,
    payload: Vec<u8, MAX_PAYLOAD_LEN>,
    chunks: u16,
}

impl Default for ChannelSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelSession {
    /// Create an idle session
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            command: None,
            payload: Vec::new(),
            chunks: 0,
        }
    }

    /// Current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Command that opened the current session
    pub fn command(&self) -> Option<Command> {
        self.command
    }

    /// Accumulated payload bytes
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Number of data chunks received in this session
    pub fn chunks_received(&self) -> u16 {
        self.chunks
    }

    /// Check if no exchange is in progress
    pub fn is_idle(&self) -> bool {
        self.state == SessionState::Idle
    }

    /// Feed one host write
    pub fn on_host_write(&mut self, value: &[u8]) -> Reaction {
        if value.len() > CHUNK_CAPACITY {
            if self.state == SessionState::Idle {
                return Reaction::Ignore;
            }
            return self.fail(ProtocolError::ChunkTooLarge);
        }

        match self.state {
            SessionState::Idle => self.begin(value),
            SessionState::AwaitingSentinel | SessionState::Accumulating => self.accumulate(value),
            SessionState::Streaming => match Sentinel::parse(value) {
                Some(Sentinel::Next) => Reaction::SendNext,
                _ => Reaction::Ignore,
            },
            SessionState::Dispatching | SessionState::Error => Reaction::Ignore,
        }
    }

    /// Move to `Error` with the given cause
    pub fn fail(&mut self, error: ProtocolError) -> Reaction {
        self.state = SessionState::Error;
        Reaction::Failed(error)
    }

    /// Discard the session and return to `Idle`
    pub fn finish(&mut self) {
        self.state = SessionState::Idle;
        self.command = None;
        self.payload.clear();
        self.chunks = 0;
    }

    fn begin(&mut self, value: &[u8]) -> Reaction {
        let Some(command) = Command::parse(value) else {
            // Unknown words are left for future extensions
            return Reaction::Ignore;
        };

        self.payload.clear();
        self.chunks = 0;
        self.command = Some(command);
        self.state = match command {
            Command::Update | Command::Overwrite => SessionState::AwaitingSentinel,
            Command::Save | Command::Reboot => SessionState::Dispatching,
            Command::Dump => SessionState::Streaming,
        };
        Reaction::Begin(command)
    }

    fn accumulate(&mut self, value: &[u8]) -> Reaction {
        // Full chunks are data; only short writes can carry a sentinel
        if value.len() < CHUNK_CAPACITY {
            match Sentinel::parse(value) {
                Some(Sentinel::Complete) => return self.complete(),
                Some(Sentinel::Ready) | Some(Sentinel::Next) => return Reaction::Ignore,
                _ => {}
            }
        }

        if self.payload.extend_from_slice(value).is_err() {
            return self.fail(ProtocolError::PayloadTooLarge);
        }
        self.chunks = self.chunks.saturating_add(1);
        self.state = SessionState::Accumulating;
        Reaction::RequestNext
    }

    fn complete(&mut self) -> Reaction {
        if self.payload.is_empty() {
            return self.fail(ProtocolError::EmptyPayload);
        }
        match self.command {
            Some(command) => {
                self.state = SessionState::Dispatching;
                Reaction::PayloadReady(command)
            }
            None => Reaction::Ignore,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_flow() {
        let mut session = ChannelSession::new();

        assert_eq!(session.on_host_write(b"Update"), Reaction::Begin(Command::Update));
        assert_eq!(session.state(), SessionState::AwaitingSentinel);

        assert_eq!(session.on_host_write(b"{\"a\":"), Reaction::RequestNext);
        assert_eq!(session.state(), SessionState::Accumulating);
        assert_eq!(session.on_host_write(b"1}"), Reaction::RequestNext);

        assert_eq!(
            session.on_host_write(b"Complete"),
            Reaction::PayloadReady(Command::Update)
        );
        assert_eq!(session.state(), SessionState::Dispatching);
        assert_eq!(session.payload(), b"{\"a\":1}");
        assert_eq!(session.chunks_received(), 2);

        session.finish();
        assert!(session.is_idle());
        assert!(session.payload().is_empty());
    }

    #[test]
    fn test_unknown_words_ignored_while_idle() {
        let mut session = ChannelSession::new();
        assert_eq!(session.on_host_write(b"Calibrate"), Reaction::Ignore);
        assert_eq!(session.on_host_write(b"Complete"), Reaction::Ignore);
        assert_eq!(session.on_host_write(b""), Reaction::Ignore);
        assert!(session.is_idle());
    }

    #[test]
    fn test_echoed_sentinels_are_not_data() {
        let mut session = ChannelSession::new();
        session.on_host_write(b"Overwrite");
        assert_eq!(session.on_host_write(b"Ready"), Reaction::Ignore);
        assert_eq!(session.on_host_write(b"{}"), Reaction::RequestNext);
        assert_eq!(session.on_host_write(b"Next"), Reaction::Ignore);
        assert_eq!(session.payload(), b"{}");
    }

    #[test]
    fn test_complete_without_data_fails() {
        let mut session = ChannelSession::new();
        session.on_host_write(b"Update");
        assert_eq!(
            session.on_host_write(b"Complete"),
            Reaction::Failed(ProtocolError::EmptyPayload)
        );
        assert_eq!(session.state(), SessionState::Error);

        // Error state swallows input until reported
        assert_eq!(session.on_host_write(b"Update"), Reaction::Ignore);
        session.finish();
        assert_eq!(session.on_host_write(b"Update"), Reaction::Begin(Command::Update));
    }

    #[test]
    fn test_payload_limit() {
        let mut session = ChannelSession::new();
        session.on_host_write(b"Update");

        let chunk = [b' '; CHUNK_CAPACITY];
        for _ in 0..(MAX_PAYLOAD_LEN / CHUNK_CAPACITY) {
            assert_eq!(session.on_host_write(&chunk), Reaction::RequestNext);
        }
        assert_eq!(
            session.on_host_write(b"}"),
            Reaction::Failed(ProtocolError::PayloadTooLarge)
        );
    }

    #[test]
    fn test_oversized_write_fails_session() {
        let mut session = ChannelSession::new();
        session.on_host_write(b"Update");
        let chunk = [b' '; CHUNK_CAPACITY + 1];
        assert_eq!(
            session.on_host_write(&chunk),
            Reaction::Failed(ProtocolError::ChunkTooLarge)
        );
    }

    #[test]
    fn test_save_and_reboot_dispatch_immediately() {
        let mut session = ChannelSession::new();
        assert_eq!(session.on_host_write(b"Save"), Reaction::Begin(Command::Save));
        assert_eq!(session.state(), SessionState::Dispatching);
        // Busy while the save runs
        assert_eq!(session.on_host_write(b"Reboot"), Reaction::Ignore);
        session.finish();

        assert_eq!(session.on_host_write(b"Reboot"), Reaction::Begin(Command::Reboot));
        assert_eq!(session.state(), SessionState::Dispatching);
    }

    #[test]
    fn test_dump_streaming() {
        let mut session = ChannelSession::new();
        assert_eq!(session.on_host_write(b"Dump"), Reaction::Begin(Command::Dump));
        assert_eq!(session.state(), SessionState::Streaming);
        assert_eq!(session.on_host_write(b"Next"), Reaction::SendNext);
        assert_eq!(session.on_host_write(b"garbage"), Reaction::Ignore);
    }
}
