//! Sensor drivers for EnviroHealthMonitor.
//!
//! Both drivers are generic over [`embedded_hal::i2c::I2c`] and borrow the
//! bus per call, so the spectral and PPG sensors share one I2C master and
//! everything is testable on the host against a mock bus. Business logic
//! stays in the core modules; the HAL is register I/O only.

pub mod as726x;
pub mod max3010x;

pub use as726x::{As726x, As726xConfig, Gain, AS726X_ADDR};
pub use max3010x::{Max3010x, Max3010xConfig, MAX3010X_ADDR};

/// Driver error, generic over the bus error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError<E> {
    /// I2C transaction failed.
    Bus(E),

    /// The sensor did not become ready within the bounded wait.
    Timeout,

    /// Device did not identify (wrong or missing part ID).
    NotFound,
}
