//! Module: ppg::window
//!
//! Purpose: AC/DC extraction over a fixed-depth history of raw PPG readings.
//! Two parallel circular buffers (IR, Red) share one write cursor; each cycle
//! overwrites the oldest slot and recomputes both components in full.
//!
//! The buffers start zero-filled, so the window is logically always full and
//! the averages are well-defined from the very first cycle. The cost is a
//! warm-up window: for the first N-1 cycles DC is biased toward zero and AC
//! can be anomalously large. Accepted inaccuracy, not an error.
//!
//! Safety: Safe. No unsafe blocks. Single writer, no concurrent readers.

/// History depth in cycles.
pub const WINDOW_DEPTH: usize = 10;

/// Per-channel DC baseline and peak-to-peak amplitude for one cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AcDc {
    /// IR moving average over the window.
    pub ir_dc: i32,
    /// Red moving average over the window.
    pub red_dc: i32,
    /// IR peak-to-peak spread over the window. Always >= 0.
    pub ir_ac: i32,
    /// Red peak-to-peak spread over the window. Always >= 0.
    pub red_ac: i32,
}

/// Fixed-depth sample window with full per-cycle recomputation.
///
/// No incremental update: at N=10 the full scan is a handful of loads per
/// cycle and keeps the arithmetic trivially correct.
pub struct SampleWindow<const N: usize = WINDOW_DEPTH> {
    ir: [i32; N],
    red: [i32; N],
    cursor: usize,
}

impl<const N: usize> SampleWindow<N> {
    /// Create a zero-filled window.
    pub const fn new() -> Self {
        assert!(N > 0, "Window depth must be nonzero");

        Self {
            ir: [0; N],
            red: [0; N],
            cursor: 0,
        }
    }

    /// Push one cycle's readings and recompute both components per channel.
    pub fn update(&mut self, ir: i32, red: i32) -> AcDc {
        self.ir[self.cursor] = ir;
        self.red[self.cursor] = red;
        self.cursor = (self.cursor + 1) % N;

        AcDc {
            ir_dc: mean(&self.ir),
            red_dc: mean(&self.red),
            ir_ac: spread(&self.ir),
            red_ac: spread(&self.red),
        }
    }
}

impl<const N: usize> Default for SampleWindow<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Arithmetic mean with integer truncation toward zero.
fn mean(slots: &[i32]) -> i32 {
    let sum: i64 = slots.iter().map(|&x| x as i64).sum();
    (sum / slots.len() as i64) as i32
}

/// Peak-to-peak spread (max - min).
fn spread(slots: &[i32]) -> i32 {
    let mut min = slots[0];
    let mut max = slots[0];
    for &x in &slots[1..] {
        if x < min {
            min = x;
        }
        if x > max {
            max = x;
        }
    }
    max - min
}
