//! MPU-6050 6-axis IMU
//!
//! Register-level driver over a blocking `embedded-hal` I2C bus. The part is
//! configured for ±8 g and ±500 °/s with the 21 Hz low-pass filter, and every
//! sample is a single 14-byte burst starting at ACCEL_XOUT_H.

use airpoint_core::motion::Sample;
use airpoint_core::traits::{MotionSensor, SensorError};
use embedded_hal::i2c::I2c;

/// I2C address with AD0 tied low
pub const DEFAULT_ADDRESS: u8 = 0x68;

const REG_CONFIG: u8 = 0x1A;
const REG_GYRO_CONFIG: u8 = 0x1B;
const REG_ACCEL_CONFIG: u8 = 0x1C;
const REG_ACCEL_XOUT_H: u8 = 0x3B;
const REG_PWR_MGMT_1: u8 = 0x6B;
const REG_WHO_AM_I: u8 = 0x75;

const WHO_AM_I_EXPECTED: u8 = 0x68;

/// DLPF_CFG = 4 (21 Hz gyro bandwidth)
const DLPF_21HZ: u8 = 0x04;
/// FS_SEL = 1
const GYRO_FS_500DPS: u8 = 0x08;
/// AFS_SEL = 2
const ACCEL_FS_8G: u8 = 0x10;
/// Clock from the X gyro PLL, sleep bit clear
const CLKSEL_PLL_X: u8 = 0x01;
const SLEEP_BIT: u8 = 0x40;

/// LSB per g at ±8 g
pub const ACCEL_SCALE_8G: f32 = 4096.0;
/// LSB per °/s at ±500 °/s
pub const GYRO_SCALE_500: f32 = 65.5;

const STANDARD_GRAVITY: f32 = 9.806_65;
const DEG_TO_RAD: f32 = core::f32::consts::PI / 180.0;

/// MPU-6050 on an I2C bus
pub struct Mpu6050<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> Mpu6050<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Check the identity register, wake the part and set ranges
    pub fn init(&mut self) -> Result<(), SensorError> {
        if self.who_am_i()? != WHO_AM_I_EXPECTED {
            return Err(SensorError::WrongDevice);
        }

        self.write_register(REG_PWR_MGMT_1, CLKSEL_PLL_X)?;
        self.write_register(REG_CONFIG, DLPF_21HZ)?;
        self.write_register(REG_GYRO_CONFIG, GYRO_FS_500DPS)?;
        self.write_register(REG_ACCEL_CONFIG, ACCEL_FS_8G)?;

        #[cfg(feature = "defmt")]
        defmt::info!("MPU-6050 at {=u8:#x}: 8g, 500dps, DLPF 21Hz", self.address);
        Ok(())
    }

    /// Read the identity register
    pub fn who_am_i(&mut self) -> Result<u8, SensorError> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.address, &[REG_WHO_AM_I], &mut buf)
            .map_err(|_| SensorError::Bus)?;
        Ok(buf[0])
    }

    /// Enter or leave the low-power sleep state
    pub fn set_sleep(&mut self, sleep: bool) -> Result<(), SensorError> {
        let value = if sleep {
            CLKSEL_PLL_X | SLEEP_BIT
        } else {
            CLKSEL_PLL_X
        };
        self.write_register(REG_PWR_MGMT_1, value)
    }

    /// Release the bus
    pub fn release(self) -> I2C {
        self.i2c
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), SensorError> {
        self.i2c
            .write(self.address, &[register, value])
            .map_err(|_| SensorError::Bus)
    }
}

/// Convert a 14-byte burst (accel, temperature, gyro) to physical units
pub fn convert_burst(raw: &[u8; 14]) -> Sample {
    let word = |i: usize| i16::from_be_bytes([raw[i], raw[i + 1]]) as f32;
    let accel = |i: usize| word(i) / ACCEL_SCALE_8G * STANDARD_GRAVITY;
    let gyro = |i: usize| word(i) / GYRO_SCALE_500 * DEG_TO_RAD;

    // raw[6..8] is temperature
    Sample {
        ax: accel(0),
        ay: accel(2),
        az: accel(4),
        gx: gyro(8),
        gy: gyro(10),
        gz: gyro(12),
    }
}

impl<I2C: I2c> MotionSensor for Mpu6050<I2C> {
    fn sample(&mut self) -> Result<Sample, SensorError> {
        let mut raw = [0u8; 14];
        self.i2c
            .write_read(self.address, &[REG_ACCEL_XOUT_H], &mut raw)
            .map_err(|_| SensorError::Bus)?;
        Ok(convert_burst(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorKind, ErrorType, Operation};

    /// Register file behind a fake bus
    struct FakeBus {
        registers: [u8; 128],
        pointer: usize,
        fail: bool,
        writes: heapless::Vec<(u8, u8), 16>,
    }

    impl FakeBus {
        fn new() -> Self {
            let mut registers = [0u8; 128];
            registers[REG_WHO_AM_I as usize] = WHO_AM_I_EXPECTED;
            Self {
                registers,
                pointer: 0,
                fail: false,
                writes: heapless::Vec::new(),
            }
        }
    }

    impl ErrorType for FakeBus {
        type Error = ErrorKind;
    }

    impl I2c for FakeBus {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            if self.fail || address != DEFAULT_ADDRESS {
                return Err(ErrorKind::Other);
            }
            for op in operations {
                match op {
                    Operation::Write(bytes) => {
                        if let Some((&register, values)) = bytes.split_first() {
                            self.pointer = register as usize;
                            for &value in values {
                                self.registers[self.pointer] = value;
                                let _ = self.writes.push((self.pointer as u8, value));
                                self.pointer += 1;
                            }
                        }
                    }
                    Operation::Read(buf) => {
                        for byte in buf.iter_mut() {
                            *byte = self.registers[self.pointer];
                            self.pointer += 1;
                        }
                    }
                }
            }
            Ok(())
        }
    }

    fn close(a: f32, b: f32) -> bool {
        let d = a - b;
        d > -1e-3 && d < 1e-3
    }

    fn put_word(bus: &mut FakeBus, register: u8, value: i16) {
        let [hi, lo] = value.to_be_bytes();
        bus.registers[register as usize] = hi;
        bus.registers[register as usize + 1] = lo;
    }

    #[test]
    fn test_init_configures_ranges() {
        let mut imu = Mpu6050::new(FakeBus::new(), DEFAULT_ADDRESS);
        imu.init().unwrap();

        let bus = imu.release();
        assert_eq!(
            bus.writes.as_slice(),
            &[
                (REG_PWR_MGMT_1, CLKSEL_PLL_X),
                (REG_CONFIG, DLPF_21HZ),
                (REG_GYRO_CONFIG, GYRO_FS_500DPS),
                (REG_ACCEL_CONFIG, ACCEL_FS_8G),
            ]
        );
    }

    #[test]
    fn test_wrong_device() {
        let mut bus = FakeBus::new();
        bus.registers[REG_WHO_AM_I as usize] = 0x70;
        let mut imu = Mpu6050::new(bus, DEFAULT_ADDRESS);
        assert_eq!(imu.init(), Err(SensorError::WrongDevice));
    }

    #[test]
    fn test_bus_error() {
        let mut bus = FakeBus::new();
        bus.fail = true;
        let mut imu = Mpu6050::new(bus, DEFAULT_ADDRESS);
        assert_eq!(imu.sample(), Err(SensorError::Bus));
    }

    #[test]
    fn test_sample_units() {
        let mut bus = FakeBus::new();
        // 1 g on Z, 90 °/s on gy, -45 °/s on gz
        put_word(&mut bus, REG_ACCEL_XOUT_H + 4, 4096);
        put_word(&mut bus, REG_ACCEL_XOUT_H + 10, 5895);
        put_word(&mut bus, REG_ACCEL_XOUT_H + 12, -2948);

        let mut imu = Mpu6050::new(bus, DEFAULT_ADDRESS);
        let s = imu.sample().unwrap();

        assert!(close(s.az, 9.806_65));
        assert!(close(s.gy, core::f32::consts::FRAC_PI_2));
        assert!(close(s.gz, -core::f32::consts::FRAC_PI_4));
        assert_eq!(s.gx, 0.0);
        assert_eq!(s.ax, 0.0);
    }

    #[test]
    fn test_sleep_bit() {
        let mut imu = Mpu6050::new(FakeBus::new(), DEFAULT_ADDRESS);
        imu.set_sleep(true).unwrap();
        imu.set_sleep(false).unwrap();

        let bus = imu.release();
        assert_eq!(
            bus.writes.as_slice(),
            &[
                (REG_PWR_MGMT_1, CLKSEL_PLL_X | SLEEP_BIT),
                (REG_PWR_MGMT_1, CLKSEL_PLL_X),
            ]
        );
    }
}
