//! Module: telemetry
//!
//! Purpose: the per-cycle record handed to the transport. The record is
//! structured; the wire text is produced only at the boundary, byte-exact to
//! the layout the paired client already parses:
//!
//! ```text
//! V:<violet>,B:<blue>,IR:<ir>,R:<red>,SpO2:<spo2>%,Hb:<hb> g/dL,<quality>
//! ```

use core::fmt::Write;

use heapless::String;

use crate::ppg::PpgMetrics;
use crate::sample::CycleSample;

/// IR count above which the raw signal is reported as good.
///
/// Deliberately a separate constant from the contact gate's DC floor even
/// though the values coincide: quality reflects the raw reading the client
/// sees, the gate classifies the extracted waveform.
pub const QUALITY_IR_FLOOR: i32 = 5_000;

/// Maximum encoded record length. Worst case with i32 readings and the
/// clamped metrics stays well under this.
pub const MAX_RECORD_LEN: usize = 96;

/// Raw-signal quality flag carried in every record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignalQuality {
    Good,
    Weak,
}

impl SignalQuality {
    /// Classify from the raw IR reading.
    pub fn from_ir(ir: i32) -> Self {
        if ir > QUALITY_IR_FLOOR {
            SignalQuality::Good
        } else {
            SignalQuality::Weak
        }
    }

    /// Wire spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            SignalQuality::Good => "Good",
            SignalQuality::Weak => "Weak",
        }
    }
}

/// One cycle's telemetry record.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TelemetryRecord {
    pub violet: u16,
    pub blue: u16,
    pub ir: i32,
    pub red: i32,
    pub spo2: u8,
    pub hb_index: f32,
    pub quality: SignalQuality,
}

impl TelemetryRecord {
    /// Assemble a record from the cycle's raw sample and derived metrics.
    pub fn new(sample: &CycleSample, metrics: &PpgMetrics) -> Self {
        Self {
            violet: sample.violet,
            blue: sample.blue,
            ir: sample.ir,
            red: sample.red,
            spo2: metrics.spo2,
            hb_index: metrics.hb_index,
            quality: SignalQuality::from_ir(sample.ir),
        }
    }

    /// Render the wire text. The hemoglobin index is rounded to one decimal.
    pub fn encode(&self) -> String<MAX_RECORD_LEN> {
        let mut out = String::new();
        // Formatting into a sized heapless string cannot fail for this
        // layout; MAX_RECORD_LEN covers the widest field combination.
        let _ = write!(
            out,
            "V:{},B:{},IR:{},R:{},SpO2:{}%,Hb:{:.1} g/dL,{}",
            self.violet,
            self.blue,
            self.ir,
            self.red,
            self.spo2,
            self.hb_index,
            self.quality.as_str()
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ppg::AcDc;

    fn metrics(spo2: u8, hb_index: f32) -> PpgMetrics {
        PpgMetrics {
            ac_dc: AcDc::default(),
            spo2,
            hb_index,
        }
    }

    #[test]
    fn test_quality_thresholds() {
        assert_eq!(SignalQuality::from_ir(5_001), SignalQuality::Good);
        assert_eq!(SignalQuality::from_ir(5_000), SignalQuality::Weak);
        assert_eq!(SignalQuality::from_ir(0), SignalQuality::Weak);
        assert_eq!(SignalQuality::from_ir(-10), SignalQuality::Weak);
    }

    #[test]
    fn test_encode_layout() {
        let sample = CycleSample {
            violet: 120,
            blue: 80,
            ir: 25_000,
            red: 20_000,
        };
        let record = TelemetryRecord::new(&sample, &metrics(97, 14.25));

        assert_eq!(
            record.encode().as_str(),
            "V:120,B:80,IR:25000,R:20000,SpO2:97%,Hb:14.2 g/dL,Good"
        );
    }

    #[test]
    fn test_encode_weak_signal() {
        let sample = CycleSample {
            violet: 0,
            blue: 0,
            ir: 0,
            red: 0,
        };
        let record = TelemetryRecord::new(&sample, &metrics(0, 0.0));

        assert_eq!(
            record.encode().as_str(),
            "V:0,B:0,IR:0,R:0,SpO2:0%,Hb:0.0 g/dL,Weak"
        );
    }

    #[test]
    fn test_encode_widest_fields_fit() {
        let record = TelemetryRecord {
            violet: u16::MAX,
            blue: u16::MAX,
            ir: i32::MIN,
            red: i32::MIN,
            spo2: 100,
            hb_index: 18.0,
            quality: SignalQuality::Weak,
        };
        let encoded = record.encode();
        assert!(encoded.len() < MAX_RECORD_LEN);
        assert!(encoded.as_str().ends_with(",Weak"));
    }
}
