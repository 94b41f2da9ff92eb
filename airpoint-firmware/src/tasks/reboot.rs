//! Deferred system reset

use defmt::*;
use embassy_time::Timer;

use crate::channels::REBOOT;

/// Grace period so the Rebooting sentinel reaches the radio
const REBOOT_DELAY_MS: u64 = 100;

#[embassy_executor::task]
pub async fn reboot_task() {
    REBOOT.wait().await;
    info!("Rebooting in {} ms", REBOOT_DELAY_MS);
    Timer::after_millis(REBOOT_DELAY_MS).await;
    cortex_m::peripheral::SCB::sys_reset();
}
