//! Radio UART receive task
//!
//! Parses frames from the radio co-processor and publishes link state and
//! host channel writes for the board bridges.

use core::sync::atomic::Ordering;
use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use airpoint_protocol::{FrameParser, RadioMessage};

use crate::channels::{CHANNEL_INBOX, LINK_CONNECTED};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Link RX task - receives and parses frames from the radio
#[embassy_executor::task]
pub async fn link_rx_task(mut rx: BufferedUartRx) {
    info!("Link RX task started");

    let mut parser = FrameParser::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                for &byte in &buf[..n] {
                    match parser.feed(byte) {
                        Ok(Some(frame)) => match RadioMessage::from_frame(&frame) {
                            Ok(message) => handle_radio_message(message),
                            Err(e) => warn!("Failed to parse radio message: {:?}", e),
                        },
                        Ok(None) => {}
                        Err(e) => warn!("Frame parse error: {:?}", e),
                    }
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}

fn handle_radio_message(message: RadioMessage) {
    match message {
        RadioMessage::LinkStatus { connected } => {
            let was = LINK_CONNECTED.swap(connected, Ordering::AcqRel);
            if was != connected {
                info!("Host link {}", if connected { "up" } else { "down" });
            }
        }
        RadioMessage::ChannelWritten(bytes) => {
            debug!("Channel write: {} bytes", bytes.len());
            CHANNEL_INBOX.signal(bytes);
        }
        RadioMessage::Pong => {
            trace!("PONG received");
        }
    }
}
