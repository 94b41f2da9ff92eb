//! Configuration channel task
//!
//! Drives [`ChannelSession`] from host writes and carries out the commands
//! it recognises. Every reply is a single device write; the host never sees
//! its own writes echoed as notifications.
//!
//! Saves are split across polls: `Saving` is written, the document handed to
//! the persistence collaborator, and the task polls until it reports back.
//! While a save is pending host writes are left unread.
//!
//! An exchange in progress is dropped without a reply when the link goes
//! down or comes back, or when the host stays silent for
//! [`SESSION_TIMEOUT_MS`].

use airpoint_protocol::channel::{
    error_report, ChannelSession, Command, OutboundStream, Reaction, Sentinel, CHUNK_CAPACITY,
};

use crate::config::payload_text;
use crate::error::ConfigError;
use crate::signals::Flag;
use crate::traits::SaveProgress;

use super::{Context, Step, Task};

/// Poll interval with no exchange in progress
pub const IDLE_POLL_MS: u32 = 100;

/// Poll interval mid-exchange
pub const ACTIVE_POLL_MS: u32 = 10;

/// Poll interval while a save is pending
pub const SAVE_POLL_MS: u32 = 20;

/// Host silence after which an unfinished exchange is dropped
pub const SESSION_TIMEOUT_MS: u64 = 10_000;

const SAVE_FAILED: &str = "save failed";

/// Host configuration channel
#[derive(Debug, Clone, Default)]
pub struct ChannelTask {
    session: ChannelSession,
    outbound: OutboundStream,
    saving: Option<Command>,
    /// Last seen `(Connected, ConnectionLost)` flags
    link: (bool, bool),
    last_write_ms: u64,
}

impl ChannelTask {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> &ChannelSession {
        &self.session
    }

    /// Check if a save is waiting on persistence
    pub fn is_saving(&self) -> bool {
        self.saving.is_some()
    }

    fn idle_step(&self) -> Step {
        if self.session.is_idle() {
            Step::Sleep(IDLE_POLL_MS)
        } else {
            Step::Sleep(ACTIVE_POLL_MS)
        }
    }

    /// Drop an unfinished exchange after a link change or host silence
    fn expire(&mut self, cx: &Context<'_, '_>) {
        let link = (
            cx.shared.flags.is_set(Flag::Connected),
            cx.shared.flags.is_set(Flag::ConnectionLost),
        );
        let relinked = link != self.link;
        self.link = link;

        if self.session.is_idle() {
            return;
        }
        let silent = cx.now_ms.saturating_sub(self.last_write_ms) >= SESSION_TIMEOUT_MS;
        if relinked || silent {
            #[cfg(feature = "defmt")]
            defmt::warn!("channel exchange dropped (relinked: {})", relinked);

            self.outbound.clear();
            self.session.finish();
        }
    }

    fn write(cx: &mut Context<'_, '_>, sentinel: Sentinel) {
        cx.io.channel.write_chunk(sentinel.as_bytes());
    }

    /// Report an error and end the session
    fn report(&mut self, cx: &mut Context<'_, '_>, kind: &str, detail: Option<&str>) {
        #[cfg(feature = "defmt")]
        defmt::warn!("channel error: {=str}", kind);

        let text = error_report(kind, detail);
        cx.io.channel.write_chunk(text.as_bytes());
        self.outbound.clear();
        self.session.finish();
    }

    fn report_config_error(&mut self, cx: &mut Context<'_, '_>, err: &ConfigError) {
        let detail = err.detail();
        self.report(cx, err.kind(), Some(detail.as_str()));
    }

    fn react(&mut self, cx: &mut Context<'_, '_>, reaction: Reaction) -> Step {
        match reaction {
            Reaction::Ignore => return self.idle_step(),
            Reaction::Begin(Command::Update | Command::Overwrite) => {
                Self::write(cx, Sentinel::Ready);
            }
            Reaction::Begin(command @ (Command::Save | Command::Reboot)) => {
                return self.start_save(cx, command);
            }
            Reaction::Begin(Command::Dump) => self.start_dump(cx),
            Reaction::RequestNext => Self::write(cx, Sentinel::Next),
            Reaction::PayloadReady(command) => self.apply(cx, command),
            Reaction::SendNext => match self.outbound.next_chunk() {
                Some(chunk) => cx.io.channel.write_chunk(chunk),
                None => {
                    Self::write(cx, Sentinel::Complete);
                    self.session.finish();
                }
            },
            Reaction::Failed(err) => self.report(cx, "malformed payload", Some(err.as_str())),
        }
        self.idle_step()
    }

    /// Parse the accumulated payload into the store
    fn apply(&mut self, cx: &mut Context<'_, '_>, command: Command) {
        let store = &mut cx.shared.store;
        let result = payload_text(self.session.payload()).and_then(|text| match command {
            Command::Overwrite => store.overwrite_json(text),
            _ => store.merge_json(text),
        });

        match result {
            Ok(_applied) => {
                #[cfg(feature = "defmt")]
                defmt::info!("{} applied {} keys", command, _applied);

                Self::write(cx, Sentinel::Complete);
                self.session.finish();
            }
            Err(err) => self.report_config_error(cx, &err),
        }
    }

    fn start_dump(&mut self, cx: &mut Context<'_, '_>) {
        let json = match cx.shared.store.to_json() {
            Ok(json) => json,
            Err(err) => return self.report_config_error(cx, &err),
        };
        if let Err(err) = self.outbound.load(json.as_bytes()) {
            return self.report(cx, "malformed payload", Some(err.as_str()));
        }
        match self.outbound.next_chunk() {
            Some(chunk) => cx.io.channel.write_chunk(chunk),
            None => {
                Self::write(cx, Sentinel::Complete);
                self.session.finish();
            }
        }
    }

    fn start_save(&mut self, cx: &mut Context<'_, '_>, command: Command) -> Step {
        Self::write(cx, Sentinel::Saving);

        let json = match cx.shared.store.to_json() {
            Ok(json) => json,
            Err(err) => {
                self.report_config_error(cx, &err);
                return self.idle_step();
            }
        };
        if let Err(err) = cx.io.persistence.save_config(&json) {
            self.report(cx, SAVE_FAILED, Some(err.as_str()));
            return self.idle_step();
        }

        self.saving = Some(command);
        self.poll_save(cx, command)
    }

    fn poll_save(&mut self, cx: &mut Context<'_, '_>, command: Command) -> Step {
        let result = match cx.io.persistence.poll_save() {
            SaveProgress::Pending => return Step::Sleep(SAVE_POLL_MS),
            SaveProgress::Done(result) => result,
        };
        self.saving = None;

        match result {
            Ok(()) if command == Command::Reboot => {
                Self::write(cx, Sentinel::Rebooting);
                self.session.finish();

                #[cfg(feature = "defmt")]
                defmt::info!("config saved, rebooting");
                cx.io.persistence.reboot();
            }
            Ok(()) => {
                Self::write(cx, Sentinel::Complete);
                self.session.finish();

                #[cfg(feature = "defmt")]
                defmt::info!("config saved");
            }
            // A failed save aborts any reboot
            Err(err) => self.report(cx, SAVE_FAILED, Some(err.as_str())),
        }
        self.idle_step()
    }
}

impl Task for ChannelTask {
    fn name(&self) -> &'static str {
        "channel"
    }

    fn poll(&mut self, cx: &mut Context<'_, '_>) -> Step {
        if let Some(command) = self.saving {
            return self.poll_save(cx, command);
        }
        self.expire(cx);
        if !cx.io.channel.take_notification() {
            return self.idle_step();
        }
        self.last_write_ms = cx.now_ms;

        // One byte over capacity so oversized writes are detectable
        let mut buf = [0u8; CHUNK_CAPACITY + 1];
        let len = cx.io.channel.read_chunk(&mut buf);
        let reaction = self.session.on_host_write(&buf[..len]);
        if reaction != Reaction::Ignore {
            cx.shared.flags.set(Flag::Activity);
        }
        self.react(cx, reaction)
    }
}
