//! PPG signal-conditioning and derived-metric pipeline.
//!
//! Pure logic, no hardware dependencies. Consumes one raw (IR, Red) pair per
//! sampling cycle, produces gated AC/DC values and the derived metrics.
//! Fully testable on host.
//!
//! Stage order per cycle: window update → contact gate → SpO2 estimate →
//! hemoglobin-index estimate. The gate zeroes the AC amplitudes when no
//! finger is present; the hemoglobin estimate works from the raw readings
//! and its own IR floor, independent of the gate.

pub mod gate;
pub mod hemoglobin;
pub mod spo2;
pub mod window;

pub use gate::ContactGate;
pub use hemoglobin::HbEstimator;
pub use window::{AcDc, SampleWindow, WINDOW_DEPTH};

use crate::config::MonitorConfig;
use crate::sample::CycleSample;

/// Derived metrics for one sampling cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PpgMetrics {
    /// Post-gate AC/DC values (AC forced to 0 when no contact).
    pub ac_dc: AcDc,

    /// SpO2 percentage: 0 when not computable, otherwise within 90..=100.
    pub spo2: u8,

    /// Hemoglobin index: 0.0 when not computable, ceiling-clamped at 18.0.
    pub hb_index: f32,
}

/// The per-device pipeline state.
///
/// Owns the sample window, the gate and the estimator baselines; mutated by
/// exactly one caller, once per cycle. Construction zero-fills the window,
/// there is nothing to tear down.
pub struct PpgPipeline {
    window: SampleWindow,
    gate: ContactGate,
    hb: HbEstimator,
}

impl PpgPipeline {
    /// Create a pipeline from monitor configuration.
    pub fn new(config: &MonitorConfig) -> Self {
        Self {
            window: SampleWindow::new(),
            gate: ContactGate::new(config.min_pulse_ac, config.min_contact_dc),
            hb: HbEstimator::new(config.ir_baseline, config.red_baseline),
        }
    }

    /// Run one sampling cycle through the pipeline.
    pub fn process(&mut self, sample: &CycleSample) -> PpgMetrics {
        let raw = self.window.update(sample.ir, sample.red);
        let gated = self.gate.apply(raw);

        PpgMetrics {
            ac_dc: gated,
            spo2: spo2::estimate(&gated),
            hb_index: self.hb.estimate(sample.ir, sample.red),
        }
    }
}

impl Default for PpgPipeline {
    fn default() -> Self {
        Self::new(&MonitorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_constant(pipeline: &mut PpgPipeline, ir: i32, red: i32, cycles: usize) -> PpgMetrics {
        let sample = CycleSample {
            violet: 0,
            blue: 0,
            ir,
            red,
        };
        let mut last = pipeline.process(&sample);
        for _ in 1..cycles {
            last = pipeline.process(&sample);
        }
        last
    }

    #[test]
    fn test_steady_signal_converges_and_gates() {
        let mut pipeline = PpgPipeline::default();
        let m = run_constant(&mut pipeline, 6_000, 5_000, 10);

        // Constant input: DC equals the constant, amplitude collapses to 0,
        // so the gate zeroes both channels and SpO2 is not computable.
        assert_eq!(m.ac_dc.ir_dc, 6_000);
        assert_eq!(m.ac_dc.red_dc, 5_000);
        assert_eq!(m.ac_dc.ir_ac, 0);
        assert_eq!(m.ac_dc.red_ac, 0);
        assert_eq!(m.spo2, 0);

        // Hemoglobin works from the raw readings: 12 + 1.5*ln(8) + ln(20/3).
        assert!((m.hb_index - 17.0163).abs() < 1e-3);
    }

    #[test]
    fn test_no_samples_yet_yields_zero_metrics() {
        let mut pipeline = PpgPipeline::default();
        let m = pipeline.process(&CycleSample::zero());

        assert_eq!(m.ac_dc.ir_dc, 0);
        assert_eq!(m.ac_dc.ir_ac, 0);
        assert_eq!(m.spo2, 0);
        assert_eq!(m.hb_index, 0.0);
    }

    #[test]
    fn test_low_dc_is_gated_regardless_of_amplitude() {
        let mut pipeline = PpgPipeline::default();

        // Alternate readings around a DC of 4000: large amplitude, but the
        // DC floor is not met, so the gate zeroes the AC values.
        let mut last = None;
        for i in 0..20 {
            let ir = if i % 2 == 0 { 3_000 } else { 5_000 };
            let sample = CycleSample {
                violet: 0,
                blue: 0,
                ir,
                red: ir,
            };
            last = Some(pipeline.process(&sample));
        }
        let m = last.unwrap();
        assert_eq!(m.ac_dc.ir_dc, 4_000);
        assert_eq!(m.ac_dc.ir_ac, 0);
        assert_eq!(m.ac_dc.red_ac, 0);
        assert_eq!(m.spo2, 0);
    }
}
