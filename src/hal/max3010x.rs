//! MAX30102 PPG sensor driver.
//!
//! Plain register file, no handshake protocol. The sensor runs in SpO2 mode
//! (Red + IR) and buffers samples in its FIFO; with rollover enabled the
//! FIFO keeps the newest data, so the once-per-second cycle reads a fresh
//! 6-byte entry (two 18-bit samples) each time.
//!
//! Reference: MAX30102 datasheet, register map.

use embedded_hal::i2c::I2c;

use super::SensorError;

/// MAX3010x I2C address (fixed).
pub const MAX3010X_ADDR: u8 = 0x57;

/// Register addresses.
#[allow(dead_code)]
mod regs {
    pub const INT_STATUS_1: u8 = 0x00;
    pub const INT_ENABLE_1: u8 = 0x02;
    pub const FIFO_WR_PTR: u8 = 0x04;
    pub const OVF_COUNTER: u8 = 0x05;
    pub const FIFO_RD_PTR: u8 = 0x06;
    pub const FIFO_DATA: u8 = 0x07;
    pub const FIFO_CONFIG: u8 = 0x08;
    pub const MODE_CONFIG: u8 = 0x09;
    pub const SPO2_CONFIG: u8 = 0x0A;
    pub const LED1_PA: u8 = 0x0C; // Red
    pub const LED2_PA: u8 = 0x0D; // IR
    pub const REV_ID: u8 = 0xFE;
    pub const PART_ID: u8 = 0xFF;
}

/// PART_ID value for the MAX3010x family.
const PART_ID_MAX3010X: u8 = 0x15;

/// MODE_CONFIG: soft reset.
const MODE_RESET: u8 = 0x40;

/// MODE_CONFIG: SpO2 mode (Red + IR).
const MODE_SPO2: u8 = 0x03;

/// FIFO_CONFIG: roll over on full.
const FIFO_ROLLOVER_EN: u8 = 0x10;

/// Reset-completion poll attempts.
const RESET_BUDGET: u32 = 100;

/// ADC sample mask (18-bit converter).
const SAMPLE_MASK: u32 = 0x3_FFFF;

/// FIFO sample averaging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum SampleAveraging {
    X1 = 0,
    X2 = 1,
    X4 = 2,
    X8 = 3,
    X16 = 4,
    X32 = 5,
}

/// Effective sample rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum SampleRate {
    Sps50 = 0,
    Sps100 = 1,
    Sps200 = 2,
    Sps400 = 3,
    Sps800 = 4,
    Sps1000 = 5,
    Sps1600 = 6,
    Sps3200 = 7,
}

/// LED pulse width (sets ADC resolution).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum PulseWidth {
    Us69 = 0,
    Us118 = 1,
    Us215 = 2,
    Us411 = 3,
}

/// ADC full-scale range in nA.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum AdcRange {
    Na2048 = 0,
    Na4096 = 1,
    Na8192 = 2,
    Na16384 = 3,
}

/// MAX30102 configuration.
#[derive(Debug, Clone, Copy)]
pub struct Max3010xConfig {
    /// Red LED drive (0x00..0xFF, ~0.2 mA per step).
    pub red_pulse_amplitude: u8,
    /// IR LED drive.
    pub ir_pulse_amplitude: u8,
    /// On-chip sample averaging.
    pub sample_averaging: SampleAveraging,
    /// Conversion rate before averaging.
    pub sample_rate: SampleRate,
    /// LED pulse width.
    pub pulse_width: PulseWidth,
    /// ADC full-scale range.
    pub adc_range: AdcRange,
}

impl Default for Max3010xConfig {
    fn default() -> Self {
        Self {
            // Low drive avoids ADC saturation against skin.
            red_pulse_amplitude: 0x05,
            ir_pulse_amplitude: 0x05,
            sample_averaging: SampleAveraging::X8,
            sample_rate: SampleRate::Sps200,
            pulse_width: PulseWidth::Us411,
            adc_range: AdcRange::Na4096,
        }
    }
}

/// MAX30102 driver. Holds configuration only; the bus is borrowed per call.
pub struct Max3010x {
    config: Max3010xConfig,
}

impl Max3010x {
    /// Create a driver with the given configuration.
    pub fn new(config: Max3010xConfig) -> Self {
        Self { config }
    }

    /// Initialize the sensor: identify, soft-reset, apply configuration and
    /// clear the FIFO.
    pub fn init<B: I2c>(&mut self, i2c: &mut B) -> Result<(), SensorError<B::Error>> {
        if self.read_reg(i2c, regs::PART_ID)? != PART_ID_MAX3010X {
            return Err(SensorError::NotFound);
        }

        self.reset(i2c)?;

        self.write_reg(
            i2c,
            regs::FIFO_CONFIG,
            ((self.config.sample_averaging as u8) << 5) | FIFO_ROLLOVER_EN,
        )?;
        self.write_reg(
            i2c,
            regs::SPO2_CONFIG,
            ((self.config.adc_range as u8) << 5)
                | ((self.config.sample_rate as u8) << 2)
                | self.config.pulse_width as u8,
        )?;
        self.write_reg(i2c, regs::LED1_PA, self.config.red_pulse_amplitude)?;
        self.write_reg(i2c, regs::LED2_PA, self.config.ir_pulse_amplitude)?;
        self.write_reg(i2c, regs::MODE_CONFIG, MODE_SPO2)?;

        self.clear_fifo(i2c)
    }

    /// Soft-reset and wait for the reset bit to clear, bounded.
    pub fn reset<B: I2c>(&mut self, i2c: &mut B) -> Result<(), SensorError<B::Error>> {
        self.write_reg(i2c, regs::MODE_CONFIG, MODE_RESET)?;
        for _ in 0..RESET_BUDGET {
            if self.read_reg(i2c, regs::MODE_CONFIG)? & MODE_RESET == 0 {
                return Ok(());
            }
        }
        Err(SensorError::Timeout)
    }

    /// Read one FIFO entry: `(ir, red)` as 18-bit counts.
    ///
    /// In SpO2 mode each entry is six bytes, Red sample first, then IR,
    /// big-endian with the top bits unused.
    pub fn read_sample<B: I2c>(&mut self, i2c: &mut B) -> Result<(i32, i32), SensorError<B::Error>> {
        let mut entry = [0u8; 6];
        i2c.write_read(MAX3010X_ADDR, &[regs::FIFO_DATA], &mut entry)
            .map_err(SensorError::Bus)?;

        let red = decode_sample(&entry[0..3]);
        let ir = decode_sample(&entry[3..6]);
        Ok((ir, red))
    }

    /// Reset FIFO read/write pointers and the overflow counter.
    fn clear_fifo<B: I2c>(&mut self, i2c: &mut B) -> Result<(), SensorError<B::Error>> {
        self.write_reg(i2c, regs::FIFO_WR_PTR, 0)?;
        self.write_reg(i2c, regs::OVF_COUNTER, 0)?;
        self.write_reg(i2c, regs::FIFO_RD_PTR, 0)
    }

    fn read_reg<B: I2c>(&mut self, i2c: &mut B, reg: u8) -> Result<u8, SensorError<B::Error>> {
        let mut value = [0u8];
        i2c.write_read(MAX3010X_ADDR, &[reg], &mut value)
            .map_err(SensorError::Bus)?;
        Ok(value[0])
    }

    fn write_reg<B: I2c>(&mut self, i2c: &mut B, reg: u8, value: u8) -> Result<(), SensorError<B::Error>> {
        i2c.write(MAX3010X_ADDR, &[reg, value])
            .map_err(SensorError::Bus)
    }
}

/// Decode a 3-byte FIFO sample to its 18-bit count.
fn decode_sample(bytes: &[u8]) -> i32 {
    let raw = ((bytes[0] as u32) << 16) | ((bytes[1] as u32) << 8) | bytes[2] as u32;
    (raw & SAMPLE_MASK) as i32
}
