//! Module: ppg::hemoglobin
//!
//! Purpose: hemoglobin-index approximation from log-absorbance against fixed
//! no-absorbance baselines. Like the SpO2 mapping this is a heuristic index,
//! not a clinical g/dL measurement.
//!
//! The baselines are static calibration constants (see
//! [`crate::config::MonitorConfig`]); they are never adjusted at runtime.

/// Linear composite offset.
const HB_OFFSET: f32 = 12.0;

/// Red absorbance coefficient.
const HB_RED_SLOPE: f32 = 1.5;

/// IR absorbance coefficient.
const HB_IR_SLOPE: f32 = 1.0;

/// Index ceiling.
const HB_CEILING: f32 = 18.0;

/// Minimum raw IR reading for the index to be computable.
const MIN_IR_READING: i32 = 5_000;

/// Absorbance-based hemoglobin-index estimator.
#[derive(Clone, Copy, Debug)]
pub struct HbEstimator {
    ir_baseline: f32,
    red_baseline: f32,
}

impl HbEstimator {
    /// Create an estimator with the given no-absorbance baselines.
    pub const fn new(ir_baseline: f32, red_baseline: f32) -> Self {
        Self {
            ir_baseline,
            red_baseline,
        }
    }

    /// Estimate the hemoglobin index for one cycle's raw readings.
    ///
    /// Returns 0.0 when the IR reading is at or below the floor or when
    /// neither channel shows absorbance; otherwise the composite is
    /// ceiling-clamped to 18.0.
    pub fn estimate(&self, ir: i32, red: i32) -> f32 {
        let abs_red = absorbance(red, self.red_baseline);
        let abs_ir = absorbance(ir, self.ir_baseline);

        let hb = if ir > MIN_IR_READING && (abs_red > 0.0 || abs_ir > 0.0) {
            HB_OFFSET + HB_RED_SLOPE * abs_red + HB_IR_SLOPE * abs_ir
        } else {
            0.0
        };

        if hb > HB_CEILING {
            HB_CEILING
        } else {
            hb
        }
    }
}

/// Log-absorbance of a reading against its baseline: max(0, -ln(x / base)).
///
/// A non-positive reading or baseline would put the logarithm outside its
/// domain; both cases are treated as "no absorbance" rather than an error.
/// Readings above baseline clamp to 0 the same way (no negative absorbance).
fn absorbance(reading: i32, baseline: f32) -> f32 {
    if baseline <= 0.0 || reading <= 0 {
        return 0.0;
    }
    let a = -libm::logf(reading as f32 / baseline);
    if a > 0.0 {
        a
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASELINE: f32 = 40_000.0;

    fn estimator() -> HbEstimator {
        HbEstimator::new(BASELINE, BASELINE)
    }

    #[test]
    fn test_reference_scenario() {
        // ir=6000, red=5000: abs_ir = ln(40000/6000) = 1.897,
        // abs_red = ln(8) = 2.079, index = 12 + 1.5*2.079 + 1.897 = 17.016.
        let hb = estimator().estimate(6_000, 5_000);
        assert!((hb - 17.0163).abs() < 1e-3);
    }

    #[test]
    fn test_ir_floor_yields_zero() {
        assert_eq!(estimator().estimate(5_000, 5_000), 0.0);
        assert_eq!(estimator().estimate(0, 5_000), 0.0);
    }

    #[test]
    fn test_non_positive_readings_are_no_absorbance() {
        // red <= 0 never reaches the logarithm; IR still contributes.
        let hb = estimator().estimate(6_000, -100);
        let expected = 12.0 + libm::logf(BASELINE / 6_000.0);
        assert!((hb - expected).abs() < 1e-4);
    }

    #[test]
    fn test_readings_above_baseline_clamp_to_zero_absorbance() {
        // Both channels above baseline: no absorbance on either, index 0.
        assert_eq!(estimator().estimate(50_000, 50_000), 0.0);
    }

    #[test]
    fn test_ceiling() {
        // Very small readings drive the composite far past the ceiling.
        assert_eq!(estimator().estimate(5_001, 1), 18.0);
    }

    #[test]
    fn test_zero_baseline_disables_channel() {
        let est = HbEstimator::new(0.0, BASELINE);
        let hb = est.estimate(6_000, 5_000);
        let expected = 12.0 + 1.5 * libm::logf(8.0);
        assert!((hb - expected).abs() < 1e-4);
    }

    #[test]
    fn test_output_bounds() {
        let est = estimator();
        for ir in [-1, 0, 1, 4_999, 5_001, 6_000, 40_000, 262_143] {
            for red in [-1, 0, 1, 5_000, 40_000, 262_143] {
                let hb = est.estimate(ir, red);
                assert!((0.0..=18.0).contains(&hb), "hb {} for ir={} red={}", hb, ir, red);
            }
        }
    }
}
