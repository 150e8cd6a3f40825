//! Fault state for the acquisition loop.
//!
//! A cycle that cannot read its sensors is skipped, not hung: the bounded
//! data-ready wait surfaces as [`FaultCode::SensorTimeout`] here, the cycle
//! is dropped and the next period retries. Faults are accumulated per code
//! so intermittent timeouts stay distinguishable from bus trouble long after
//! the active fault has cleared.

use core::sync::atomic::{AtomicU32, AtomicU8, Ordering};

/// Number of distinct fault codes, including `None`.
const FAULT_KINDS: usize = 5;

/// Fault codes indicating why a cycle was skipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum FaultCode {
    /// No fault (normal operation).
    None = 0,

    /// Sensor never signalled data-ready within the bounded wait.
    SensorTimeout = 1,

    /// Sensor did not identify at init (wrong or missing part ID).
    SensorNotFound = 2,

    /// I2C transaction failed mid-cycle.
    BusError = 3,

    /// Telemetry link dropped records (client not reading notifications).
    TransportStall = 4,
}

impl FaultCode {
    /// Convert from raw u8 value.
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => FaultCode::SensorTimeout,
            2 => FaultCode::SensorNotFound,
            3 => FaultCode::BusError,
            4 => FaultCode::TransportStall,
            _ => FaultCode::None,
        }
    }
}

/// Thread-safe fault state.
///
/// The code itself is the activity flag: `None` means the last cycle
/// completed. `set` latches the code plus a code-specific detail word and
/// bumps that code's accumulator; `clear` resets only the code, so the
/// detail word and the per-code totals survive for post-mortem reads from
/// the BLE/console side.
pub struct FaultState {
    /// Active fault code; `FaultCode::None` when the last cycle completed.
    code: AtomicU8,

    /// Detail for the active code (cycle number, dropped-record count, ...).
    data: AtomicU32,

    /// Per-code totals since boot, indexed by code. Never cleared.
    counts: [AtomicU32; FAULT_KINDS],
}

impl FaultState {
    /// Create new fault state (no fault).
    pub const fn new() -> Self {
        const ZERO: AtomicU32 = AtomicU32::new(0);
        Self {
            code: AtomicU8::new(0),
            data: AtomicU32::new(0),
            counts: [ZERO; FAULT_KINDS],
        }
    }

    /// Latch a fault with the given code and detail word. Bumps the code's
    /// accumulator. Latching `FaultCode::None` is a no-op; use [`clear`].
    ///
    /// [`clear`]: FaultState::clear
    #[inline]
    pub fn set(&self, code: FaultCode, data: u32) {
        if code == FaultCode::None {
            return;
        }
        self.data.store(data, Ordering::Release);
        self.counts[code as usize].fetch_add(1, Ordering::Relaxed);
        self.code.store(code as u8, Ordering::Release);
    }

    /// Check if a fault is currently active.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.code() != FaultCode::None
    }

    /// Get the active fault code (`None` when the last cycle completed).
    #[inline]
    pub fn code(&self) -> FaultCode {
        FaultCode::from_u8(self.code.load(Ordering::Acquire))
    }

    /// Get the detail word of the most recent fault (meaning depends on the
    /// code; preserved across `clear`).
    #[inline]
    pub fn data(&self) -> u32 {
        self.data.load(Ordering::Acquire)
    }

    /// Faults of one specific code since boot.
    #[inline]
    pub fn count_of(&self, code: FaultCode) -> u32 {
        self.counts[code as usize].load(Ordering::Relaxed)
    }

    /// Total fault count since boot, all codes.
    #[inline]
    pub fn count(&self) -> u32 {
        self.counts[1..]
            .iter()
            .map(|c| c.load(Ordering::Relaxed))
            .sum()
    }

    /// Clear the active code after a successful cycle. The detail word and
    /// the per-code totals are preserved for diagnostics.
    #[inline]
    pub fn clear(&self) {
        self.code.store(FaultCode::None as u8, Ordering::Release);
    }

    /// Snapshot of the current fault state.
    #[inline]
    pub fn snapshot(&self) -> FaultSnapshot {
        FaultSnapshot {
            active: self.is_active(),
            code: self.code(),
            data: self.data(),
            count: self.count(),
        }
    }
}

impl Default for FaultState {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of fault state at a point in time.
#[derive(Clone, Copy, Debug)]
pub struct FaultSnapshot {
    pub active: bool,
    pub code: FaultCode,
    pub data: u32,
    pub count: u32,
}
