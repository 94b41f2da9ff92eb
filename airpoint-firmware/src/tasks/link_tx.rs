//! Radio UART transmit task
//!
//! Drains the outbound queue onto the UART and pings the radio when the
//! link has been quiet.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::uart::BufferedUartTx;
use embassy_time::{Duration, Timer};
use embedded_io_async::Write;

use airpoint_protocol::link::MAX_FRAME_SIZE;
use airpoint_protocol::DeviceMessage;

use crate::channels::LINK_TX;

/// Heartbeat interval on an idle link
const PING_INTERVAL: Duration = Duration::from_secs(5);

/// Link TX task - sends queued messages to the radio
#[embassy_executor::task]
pub async fn link_tx_task(mut tx: BufferedUartTx) {
    info!("Link TX task started");

    let mut buf = [0u8; MAX_FRAME_SIZE];

    loop {
        let message = match select(LINK_TX.receive(), Timer::after(PING_INTERVAL)).await {
            Either::First(message) => message,
            Either::Second(()) => DeviceMessage::Ping,
        };
        send_message(&mut tx, &message, &mut buf).await;
    }
}

async fn send_message(tx: &mut BufferedUartTx, message: &DeviceMessage, buf: &mut [u8]) {
    let frame = match message.to_frame() {
        Ok(frame) => frame,
        Err(e) => {
            warn!("Failed to build frame: {:?}", e);
            return;
        }
    };

    match frame.encode(buf) {
        Ok(len) => {
            if let Err(e) = tx.write_all(&buf[..len]).await {
                warn!("UART write error: {:?}", e);
            } else {
                trace!("TX: {} bytes", len);
            }
        }
        Err(e) => warn!("Failed to encode frame: {:?}", e),
    }
}
