//! Module: ppg::gate
//!
//! Purpose: finger/signal-presence gate. A finger off the emitter/detector
//! produces a near-flat, low-amplitude IR trace; gating the AC amplitudes to
//! zero keeps nonsensical ratios out of the estimators downstream.
//!
//! Only the IR channel is inspected (it is the primary contact-detection
//! signal) but both channels are gated together.

use super::window::AcDc;

/// Minimum IR peak-to-peak amplitude for a pulsatile signal.
pub const MIN_PULSE_AC: i32 = 50;

/// Minimum IR DC level for skin contact.
pub const MIN_CONTACT_DC: i32 = 5_000;

/// Threshold classifier for finger presence. Stateless and idempotent.
#[derive(Clone, Copy, Debug)]
pub struct ContactGate {
    min_pulse_ac: i32,
    min_contact_dc: i32,
}

impl ContactGate {
    /// Create a gate with explicit thresholds.
    pub const fn new(min_pulse_ac: i32, min_contact_dc: i32) -> Self {
        Self {
            min_pulse_ac,
            min_contact_dc,
        }
    }

    /// Whether the IR channel shows a real physiological signal.
    #[inline]
    pub fn contact(&self, ac_dc: &AcDc) -> bool {
        ac_dc.ir_ac >= self.min_pulse_ac && ac_dc.ir_dc >= self.min_contact_dc
    }

    /// Zero both AC amplitudes when no contact is detected.
    #[inline]
    pub fn apply(&self, mut ac_dc: AcDc) -> AcDc {
        if !self.contact(&ac_dc) {
            ac_dc.ir_ac = 0;
            ac_dc.red_ac = 0;
        }
        ac_dc
    }
}

impl Default for ContactGate {
    fn default() -> Self {
        Self::new(MIN_PULSE_AC, MIN_CONTACT_DC)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acdc(ir_dc: i32, ir_ac: i32, red_dc: i32, red_ac: i32) -> AcDc {
        AcDc {
            ir_dc,
            red_dc,
            ir_ac,
            red_ac,
        }
    }

    #[test]
    fn test_pass_through_with_contact() {
        let gate = ContactGate::default();
        let input = acdc(25_000, 300, 20_000, 200);
        assert_eq!(gate.apply(input), input);
    }

    #[test]
    fn test_low_amplitude_gates_both_channels() {
        let gate = ContactGate::default();
        let out = gate.apply(acdc(25_000, 49, 20_000, 200));
        assert_eq!(out.ir_ac, 0);
        assert_eq!(out.red_ac, 0);
        // DC values pass through untouched.
        assert_eq!(out.ir_dc, 25_000);
        assert_eq!(out.red_dc, 20_000);
    }

    #[test]
    fn test_low_dc_gates_both_channels() {
        let gate = ContactGate::default();
        let out = gate.apply(acdc(4_000, 6_000, 4_000, 6_000));
        assert_eq!(out.ir_ac, 0);
        assert_eq!(out.red_ac, 0);
    }

    #[test]
    fn test_red_channel_not_inspected() {
        // Red amplitude of zero does not gate a healthy IR signal.
        let gate = ContactGate::default();
        let out = gate.apply(acdc(25_000, 300, 20_000, 0));
        assert_eq!(out.ir_ac, 300);
    }

    #[test]
    fn test_idempotent() {
        let gate = ContactGate::default();
        for input in [
            acdc(25_000, 300, 20_000, 200),
            acdc(25_000, 10, 20_000, 200),
            acdc(1_000, 300, 20_000, 200),
            acdc(0, 0, 0, 0),
        ] {
            let once = gate.apply(input);
            assert_eq!(gate.apply(once), once);
        }
    }
}
