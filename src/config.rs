//! Module: config
//!
//! Purpose: monitor-level configuration. Sensor register settings live with
//! their drivers ([`crate::hal`]); this struct carries the pipeline constants
//! and cycle timing.

/// Monitor configuration.
///
/// The hemoglobin baselines are static calibration constants: they are set
/// once at construction and never updated at runtime. Recalibrating them on
/// the fly would change the observable output, so drift correction is left
/// to whoever owns the calibration procedure.
#[derive(Clone, Copy, Debug)]
pub struct MonitorConfig {
    /// IR no-absorbance baseline for the hemoglobin index.
    pub ir_baseline: f32,

    /// Red no-absorbance baseline for the hemoglobin index.
    pub red_baseline: f32,

    /// Minimum IR peak-to-peak amplitude for finger contact.
    pub min_pulse_ac: i32,

    /// Minimum IR DC level for finger contact.
    pub min_contact_dc: i32,

    /// Inter-cycle delay in milliseconds.
    pub cycle_period_ms: u32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            ir_baseline: 40_000.0,
            red_baseline: 40_000.0,
            min_pulse_ac: crate::ppg::gate::MIN_PULSE_AC,
            min_contact_dc: crate::ppg::gate::MIN_CONTACT_DC,
            cycle_period_ms: 1_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_reference_constants() {
        let cfg = MonitorConfig::default();
        assert_eq!(cfg.ir_baseline, 40_000.0);
        assert_eq!(cfg.red_baseline, 40_000.0);
        assert_eq!(cfg.min_pulse_ac, 50);
        assert_eq!(cfg.min_contact_dc, 5_000);
        assert_eq!(cfg.cycle_period_ms, 1_000);
    }
}
