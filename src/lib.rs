//! # EnviroHealthMonitor
//!
//! Firmware core for a wearable biosensing peripheral: an AS7262 spectral
//! sensor and a MAX30102 PPG sensor share one I2C bus; once per second the
//! acquisition loop reads a (violet, blue, ir, red) tuple, runs the PPG
//! pipeline (AC/DC extraction, contact gating, SpO2 and hemoglobin-index
//! estimates) and streams a text telemetry record over a BLE notification
//! characteristic.
//!
//! ## Architecture
//!
//! ```text
//! sensors ──▶ CycleSample ──▶ PpgPipeline ──▶ TelemetryRecord ──▶ BLE notify
//!             (hal::*)        (window/gate/                       (ble::TelemetryLink)
//!                              spo2/hemoglobin)
//! ```
//!
//! Everything in this library is pure logic or generic over
//! `embedded_hal::i2c::I2c` and runs on the host; the ESP32 binding lives in
//! the `monitor` binary behind the `esp32` feature.

#![cfg_attr(not(test), no_std)]

pub mod ble;
pub mod config;
pub mod fault;
pub mod hal;
pub mod logging;
pub mod ppg;
pub mod sample;
pub mod telemetry;

pub use ble::TelemetryLink;
pub use config::MonitorConfig;
pub use fault::{FaultCode, FaultState};
pub use hal::SensorError;
pub use ppg::{AcDc, PpgMetrics, PpgPipeline};
pub use sample::CycleSample;
pub use telemetry::{SignalQuality, TelemetryRecord};
