//! Airpoint - Motion Controller Firmware
//!
//! Main firmware binary for RP2040-based wands. An MPU-6050 on I2C drives
//! pointer and keyboard reports; a radio co-processor on UART0 owns the
//! wireless link and relays the configuration channel.

#![no_std]
#![no_main]

extern crate alloc;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Channel as AdcChannel, Config as AdcConfig};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::Pull;
use embassy_rp::i2c::{Config as I2cConfig, I2c};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, BufferedUart, Config as UartConfig};
use embedded_alloc::LlffHeap as Heap;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use airpoint_drivers::battery::BatteryGauge;
use airpoint_drivers::imu::{Mpu6050, MPU6050_ADDRESS};

use crate::board::adc::{ADC_VREF_MV, VSYS_R_BOTTOM_OHMS, VSYS_R_TOP_OHMS};
use crate::board::RpAdc;
use crate::config::{load_store, FlashStorage};

mod board;
mod channels;
mod config;
mod tasks;

// Heap allocator for the JSON configuration store
#[global_allocator]
static HEAP: Heap = Heap::empty();

// Heap size: 48KB
const HEAP_SIZE: usize = 48 * 1024;

/// Radio link baud rate
const LINK_BAUD: u32 = 115_200;

/// IMU bus speed
const I2C_FREQUENCY_HZ: u32 = 400_000;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 1024]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 1024]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Airpoint firmware starting...");

    init_heap();

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Load configuration, then hand the flash to the storage task
    let mut flash = FlashStorage::new(p.FLASH, p.DMA_CH0);
    let store = load_store(&mut flash).await;

    // Radio co-processor on UART0 (GP0 TX, GP1 RX)
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = LINK_BAUD;
    let tx_buf = TX_BUF.init([0u8; 1024]);
    let rx_buf = RX_BUF.init([0u8; 1024]);
    let uart = BufferedUart::new(p.UART0, p.PIN_0, p.PIN_1, Irqs, tx_buf, rx_buf, uart_config);
    let (tx, rx) = uart.split();

    // MPU-6050 on I2C0 (GP4 SDA, GP5 SCL)
    let mut i2c_config = I2cConfig::default();
    i2c_config.frequency = I2C_FREQUENCY_HZ;
    let i2c = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c_config);
    let mut imu = Mpu6050::new(i2c, MPU6050_ADDRESS);
    if let Err(e) = imu.init() {
        // Sampling reports the fault once its retries run out
        error!("IMU init failed: {:?}", e);
    }

    // VSYS divider on GP29 (ADC3)
    let adc = Adc::new_blocking(p.ADC, AdcConfig::default());
    let vsys = AdcChannel::new_pin(p.PIN_29, Pull::None);
    let battery = BatteryGauge::new(
        RpAdc::new(adc, vsys),
        ADC_VREF_MV,
        VSYS_R_TOP_OHMS,
        VSYS_R_BOTTOM_OHMS,
    );

    spawner.spawn(unwrap!(tasks::link_rx_task(rx)));
    spawner.spawn(unwrap!(tasks::link_tx_task(tx)));
    spawner.spawn(unwrap!(tasks::storage_task(flash)));
    spawner.spawn(unwrap!(tasks::reboot_task()));
    spawner.spawn(unwrap!(tasks::supervisor_task(store, imu, battery)));

    info!("All tasks spawned, firmware running");

    // Main task has nothing else to do - all work happens in spawned tasks
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Initialize the heap allocator
fn init_heap() {
    use core::mem::MaybeUninit;
    static mut HEAP_MEM: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
    #[allow(static_mut_refs)]
    unsafe {
        HEAP.init(HEAP_MEM.as_ptr() as usize, HEAP_SIZE)
    }
}
