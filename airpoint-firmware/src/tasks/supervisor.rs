//! Supervisor driver task
//!
//! Runs the core supervisor on embassy time. All board collaborators live
//! on this task's stack; the supervisor borrows them for its lifetime.

use defmt::*;
use embassy_futures::yield_now;
use embassy_rp::i2c::{Blocking, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_time::{Duration, Instant, Timer};

use airpoint_core::config::StateStore;
use airpoint_core::tasks::Io;
use airpoint_core::Supervisor;
use airpoint_drivers::battery::BatteryGauge;
use airpoint_drivers::imu::Mpu6050;

use crate::board::{FlashPersistence, LinkChannel, LinkHid, LinkTransport, RpAdc};

/// IMU on the board I2C bus
pub type BoardImu = Mpu6050<I2c<'static, I2C0, Blocking>>;

/// Battery gauge on the VSYS divider
pub type BoardBattery = BatteryGauge<RpAdc>;

#[embassy_executor::task]
pub async fn supervisor_task(store: StateStore, mut imu: BoardImu, mut battery: BoardBattery) {
    info!("Supervisor task started");

    let mut hid = LinkHid::new();
    let mut transport = LinkTransport;
    let mut channel = LinkChannel::new();
    let mut persistence = FlashPersistence::new();

    let io = Io {
        sensor: &mut imu,
        hid: &mut hid,
        transport: &mut transport,
        channel: &mut channel,
        persistence: &mut persistence,
        battery: &mut battery,
    };
    let mut supervisor = Supervisor::new(store, io);

    let start = Instant::now();
    loop {
        let now_ms = start.elapsed().as_millis();

        match supervisor.run_once(now_ms) {
            Some(deadline) if deadline <= now_ms => yield_now().await,
            Some(deadline) => Timer::at(start + Duration::from_millis(deadline)).await,
            None => break,
        }
    }

    warn!("All supervised tasks exited");
}
