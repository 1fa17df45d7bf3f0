//! Scan-loop timing.

use std::time::Duration;

/// Same payload seen again within this window is ignored.
pub const DEFAULT_DUPLICATE_WINDOW: Duration = Duration::from_millis(1000);

/// Pause after a request settles before the next one may start.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(400);

/// Upper bound on a single validation call.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(8);

/// Timing knobs for a [`ScanController`](crate::ScanController).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanSettings {
    pub duplicate_window: Duration,
    pub cooldown: Duration,
    /// A hung authority releases the lock after this long and the scan is
    /// reported as an error.
    pub request_timeout: Duration,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            duplicate_window: DEFAULT_DUPLICATE_WINDOW,
            cooldown: DEFAULT_COOLDOWN,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}
