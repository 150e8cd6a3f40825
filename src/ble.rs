//! BLE telemetry link state.
//!
//! Hardware-independent side of the wireless transport: the GATT service
//! layout the paired client expects, plus the connection/notify state the
//! stack callbacks toggle. The actual radio write happens at the binary
//! boundary; the library only decides whether a record should go out and
//! keeps the counters.
//!
//! ```text
//! Telemetry Service (4fafc201-...)
//! └── Telemetry Record (beb5483e-...) [Notify]  - one text record per cycle
//! ```

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::telemetry::TelemetryRecord;

/// Telemetry service UUID (fixed, known to the paired client).
pub const TELEMETRY_SERVICE_UUID: u128 = 0x4fafc201_1fb5_459e_8fcc_c5c9c331914b;

/// Telemetry record characteristic UUID (notify-only).
pub const TELEMETRY_CHAR_UUID: u128 = 0xbeb5483e_36e1_4688_b7f5_ea07361b26a8;

/// Advertised device name.
pub const DEVICE_NAME: &str = "EnviroHealthMonitor";

/// Shared link state (atomics, safe to touch from stack callbacks).
pub struct TelemetryLink {
    /// A central is connected.
    connected: AtomicBool,

    /// The central subscribed to record notifications.
    notify_enabled: AtomicBool,

    /// Records handed to the radio since boot.
    records_sent: AtomicU32,

    /// Records produced while nobody was listening.
    records_dropped: AtomicU32,
}

impl TelemetryLink {
    /// Create a disconnected link.
    pub const fn new() -> Self {
        Self {
            connected: AtomicBool::new(false),
            notify_enabled: AtomicBool::new(false),
            records_sent: AtomicU32::new(0),
            records_dropped: AtomicU32::new(0),
        }
    }

    /// Connection callback from the stack.
    pub fn on_connect(&self) {
        self.connected.store(true, Ordering::Release);
    }

    /// Disconnection callback. Subscriptions do not survive a disconnect.
    pub fn on_disconnect(&self) {
        self.connected.store(false, Ordering::Release);
        self.notify_enabled.store(false, Ordering::Release);
    }

    /// Whether a central is connected.
    #[inline]
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    /// Subscription change from the client characteristic configuration.
    pub fn set_notify(&self, enabled: bool) {
        self.notify_enabled.store(enabled, Ordering::Release);
    }

    /// Decide whether this cycle's record goes to the radio.
    ///
    /// Returns `true` when connected and subscribed; the caller then writes
    /// the characteristic value and notifies. Either way the outcome is
    /// counted, so a stalled transport is visible in diagnostics.
    pub fn submit(&self, _record: &TelemetryRecord) -> bool {
        if self.is_connected() && self.notify_enabled.load(Ordering::Acquire) {
            self.records_sent.fetch_add(1, Ordering::Relaxed);
            true
        } else {
            self.records_dropped.fetch_add(1, Ordering::Relaxed);
            false
        }
    }

    /// Records handed to the radio since boot.
    #[inline]
    pub fn records_sent(&self) -> u32 {
        self.records_sent.load(Ordering::Relaxed)
    }

    /// Records produced with no subscriber since boot.
    #[inline]
    pub fn records_dropped(&self) -> u32 {
        self.records_dropped.load(Ordering::Relaxed)
    }
}

impl Default for TelemetryLink {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::SignalQuality;

    fn record() -> TelemetryRecord {
        TelemetryRecord {
            violet: 1,
            blue: 2,
            ir: 6_000,
            red: 5_000,
            spo2: 0,
            hb_index: 16.0,
            quality: SignalQuality::Good,
        }
    }

    #[test]
    fn test_disconnected_drops() {
        let link = TelemetryLink::new();
        assert!(!link.submit(&record()));
        assert_eq!(link.records_sent(), 0);
        assert_eq!(link.records_dropped(), 1);
    }

    #[test]
    fn test_connected_and_subscribed_sends() {
        let link = TelemetryLink::new();
        link.on_connect();

        // Connected but not subscribed: still dropped.
        assert!(!link.submit(&record()));

        link.set_notify(true);
        assert!(link.submit(&record()));
        assert_eq!(link.records_sent(), 1);
        assert_eq!(link.records_dropped(), 1);
    }

    #[test]
    fn test_unsubscribe_stops_submission() {
        let link = TelemetryLink::new();
        link.on_connect();
        link.set_notify(true);
        assert!(link.submit(&record()));

        // Client clears the notify bit without disconnecting.
        link.set_notify(false);
        assert!(!link.submit(&record()));
        assert_eq!(link.records_sent(), 1);
        assert_eq!(link.records_dropped(), 1);
    }

    #[test]
    fn test_disconnect_clears_subscription() {
        let link = TelemetryLink::new();
        link.on_connect();
        link.set_notify(true);
        assert!(link.submit(&record()));

        link.on_disconnect();
        link.on_connect();

        // Re-connected, but the old subscription is gone.
        assert!(!link.submit(&record()));
    }
}
