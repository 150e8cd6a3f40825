//! Module: sample
//!
//! Purpose: the per-cycle reading tuple. One `CycleSample` is produced per
//! sampling period, consumed by the pipeline immediately and never retained.
//!
//! Safety: Safe. No unsafe blocks. Copy types only.

/// One sampling cycle's raw readings.
///
/// `violet` and `blue` are raw channel counts from the spectral sensor;
/// `ir` and `red` are raw PPG counts (18-bit ADC, so always within i32).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CycleSample {
    /// Violet channel (450 nm), raw count.
    pub violet: u16,

    /// Blue channel (500 nm), raw count.
    pub blue: u16,

    /// Infrared PPG count.
    pub ir: i32,

    /// Red PPG count.
    pub red: i32,
}

impl CycleSample {
    /// All-zero sample, used for initialization and testing.
    pub const fn zero() -> Self {
        Self {
            violet: 0,
            blue: 0,
            ir: 0,
            red: 0,
        }
    }
}
