//! AS7262 spectral sensor driver.
//!
//! The AS726x family hides its register file behind a virtual-register
//! protocol: three physical I2C registers (STATUS/WRITE/READ) gate access to
//! the real ones, with handshake bits polled between each byte. Every
//! handshake poll here is bounded, so a wedged sensor surfaces as
//! [`SensorError::Timeout`] instead of hanging the cycle.
//!
//! Reference: AS7262 datasheet, I2C virtual register interface.

use embedded_hal::i2c::I2c;

use super::SensorError;

/// AS726x I2C address (fixed).
pub const AS726X_ADDR: u8 = 0x49;

/// Physical registers of the virtual-register interface.
mod phys {
    pub const STATUS: u8 = 0x00;
    pub const WRITE: u8 = 0x01;
    pub const READ: u8 = 0x02;

    /// STATUS: write buffer still occupied.
    pub const TX_VALID: u8 = 0x02;
    /// STATUS: read data available.
    pub const RX_VALID: u8 = 0x01;
}

/// Virtual register addresses.
#[allow(dead_code)]
mod regs {
    pub const DEVICE_TYPE: u8 = 0x00;
    pub const HW_VERSION: u8 = 0x01;
    pub const CONTROL_SETUP: u8 = 0x04;
    pub const INT_T: u8 = 0x05;
    pub const DEVICE_TEMP: u8 = 0x06;
    pub const LED_CONTROL: u8 = 0x07;
    // Raw channel counts, big-endian u16 per channel.
    pub const V_HIGH: u8 = 0x08;
    pub const B_HIGH: u8 = 0x0A;
    pub const G_HIGH: u8 = 0x0C;
    pub const Y_HIGH: u8 = 0x0E;
    pub const O_HIGH: u8 = 0x10;
    pub const R_HIGH: u8 = 0x12;
}

/// DEVICE_TYPE value for the AS726x family.
const DEVICE_TYPE_AS726X: u8 = 0x40;

/// CONTROL_SETUP: data-ready flag.
const CTRL_DATA_RDY: u8 = 0x02;

/// One-shot measurement of all channels (bank mode 3).
const BANK_ONE_SHOT: u8 = 3;

/// LED_CONTROL: enable the on-board driver LED.
const LED_DRV_ENABLE: u8 = 0x08;

/// Handshake poll attempts per virtual-register byte.
const HANDSHAKE_BUDGET: u32 = 100;

/// Sensor gain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Gain {
    X1 = 0,
    X3_7 = 1,
    X16 = 2,
    X64 = 3,
}

/// AS7262 configuration.
#[derive(Debug, Clone, Copy)]
pub struct As726xConfig {
    /// Channel gain.
    pub gain: Gain,
    /// Integration time in units of 2.8 ms.
    pub integration_units: u8,
    /// Delay between data-ready polls, milliseconds.
    pub poll_interval_ms: u32,
    /// Maximum data-ready polls per measurement before timing out.
    pub poll_budget: u32,
}

impl Default for As726xConfig {
    fn default() -> Self {
        Self {
            gain: Gain::X16,
            integration_units: 250, // 700 ms, favors stability over rate
            poll_interval_ms: 5,
            poll_budget: 200, // bounds the wait at ~1 s
        }
    }
}

/// AS7262 driver. Holds configuration only; the bus is borrowed per call.
pub struct As726x {
    config: As726xConfig,
}

impl As726x {
    /// Create a driver with the given configuration.
    pub fn new(config: As726xConfig) -> Self {
        Self { config }
    }

    /// Initialize the sensor: identify it, then apply gain and integration
    /// time.
    pub fn init<B: I2c>(&mut self, i2c: &mut B) -> Result<(), SensorError<B::Error>> {
        let device_type = self.read_vreg(i2c, regs::DEVICE_TYPE)?;
        if device_type != DEVICE_TYPE_AS726X {
            return Err(SensorError::NotFound);
        }

        self.write_vreg(i2c, regs::INT_T, self.config.integration_units)?;
        self.write_vreg(i2c, regs::CONTROL_SETUP, self.control_byte())?;
        Ok(())
    }

    /// Enable the on-board driver LED (illuminates the sample).
    pub fn enable_drv_led<B: I2c>(&mut self, i2c: &mut B) -> Result<(), SensorError<B::Error>> {
        let led = self.read_vreg(i2c, regs::LED_CONTROL)?;
        self.write_vreg(i2c, regs::LED_CONTROL, led | LED_DRV_ENABLE)
    }

    /// Kick off a one-shot measurement of all channels.
    ///
    /// Rewriting CONTROL_SETUP clears the data-ready flag; the sensor raises
    /// it again when the new conversion completes.
    pub fn start_measurement<B: I2c>(&mut self, i2c: &mut B) -> Result<(), SensorError<B::Error>> {
        self.write_vreg(i2c, regs::CONTROL_SETUP, self.control_byte())
    }

    /// Whether the current measurement has completed.
    pub fn data_ready<B: I2c>(&mut self, i2c: &mut B) -> Result<bool, SensorError<B::Error>> {
        let ctrl = self.read_vreg(i2c, regs::CONTROL_SETUP)?;
        Ok(ctrl & CTRL_DATA_RDY != 0)
    }

    /// Block until data is ready, bounded by the configured poll budget.
    ///
    /// `delay_ms` is supplied by the platform (FreeRTOS delay on target,
    /// a no-op closure in tests).
    pub fn wait_data_ready<B: I2c>(
        &mut self,
        i2c: &mut B,
        mut delay_ms: impl FnMut(u32),
    ) -> Result<(), SensorError<B::Error>> {
        for _ in 0..self.config.poll_budget {
            if self.data_ready(i2c)? {
                return Ok(());
            }
            delay_ms(self.config.poll_interval_ms);
        }
        Err(SensorError::Timeout)
    }

    /// Read the raw violet channel count (450 nm).
    pub fn read_violet<B: I2c>(&mut self, i2c: &mut B) -> Result<u16, SensorError<B::Error>> {
        self.read_channel(i2c, regs::V_HIGH)
    }

    /// Read the raw blue channel count (500 nm).
    pub fn read_blue<B: I2c>(&mut self, i2c: &mut B) -> Result<u16, SensorError<B::Error>> {
        self.read_channel(i2c, regs::B_HIGH)
    }

    /// CONTROL_SETUP byte for the configured gain in one-shot mode.
    fn control_byte(&self) -> u8 {
        ((self.config.gain as u8) << 4) | (BANK_ONE_SHOT << 2)
    }

    fn read_channel<B: I2c>(&mut self, i2c: &mut B, high: u8) -> Result<u16, SensorError<B::Error>> {
        let hi = self.read_vreg(i2c, high)?;
        let lo = self.read_vreg(i2c, high + 1)?;
        Ok(u16::from_be_bytes([hi, lo]))
    }

    /// Poll STATUS until `mask` bits match `want`, bounded.
    fn wait_status<B: I2c>(
        &mut self,
        i2c: &mut B,
        mask: u8,
        want: u8,
    ) -> Result<(), SensorError<B::Error>> {
        for _ in 0..HANDSHAKE_BUDGET {
            let mut status = [0u8];
            i2c.write_read(AS726X_ADDR, &[phys::STATUS], &mut status)
                .map_err(SensorError::Bus)?;
            if status[0] & mask == want {
                return Ok(());
            }
        }
        Err(SensorError::Timeout)
    }

    /// Virtual-register read.
    fn read_vreg<B: I2c>(&mut self, i2c: &mut B, vreg: u8) -> Result<u8, SensorError<B::Error>> {
        // Discard a stale pending byte from an interrupted transaction.
        let mut status = [0u8];
        i2c.write_read(AS726X_ADDR, &[phys::STATUS], &mut status)
            .map_err(SensorError::Bus)?;
        if status[0] & phys::RX_VALID != 0 {
            let mut stale = [0u8];
            i2c.write_read(AS726X_ADDR, &[phys::READ], &mut stale)
                .map_err(SensorError::Bus)?;
        }

        self.wait_status(i2c, phys::TX_VALID, 0)?;
        i2c.write(AS726X_ADDR, &[phys::WRITE, vreg])
            .map_err(SensorError::Bus)?;
        self.wait_status(i2c, phys::RX_VALID, phys::RX_VALID)?;

        let mut value = [0u8];
        i2c.write_read(AS726X_ADDR, &[phys::READ], &mut value)
            .map_err(SensorError::Bus)?;
        Ok(value[0])
    }

    /// Virtual-register write. Bit 7 of the address selects write access.
    fn write_vreg<B: I2c>(
        &mut self,
        i2c: &mut B,
        vreg: u8,
        value: u8,
    ) -> Result<(), SensorError<B::Error>> {
        self.wait_status(i2c, phys::TX_VALID, 0)?;
        i2c.write(AS726X_ADDR, &[phys::WRITE, vreg | 0x80])
            .map_err(SensorError::Bus)?;
        self.wait_status(i2c, phys::TX_VALID, 0)?;
        i2c.write(AS726X_ADDR, &[phys::WRITE, value])
            .map_err(SensorError::Bus)?;
        Ok(())
    }
}
