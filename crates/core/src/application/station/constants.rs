// Station constants (no magic values in the loop)

use std::time::Duration;

/// Default polling period between cycles (1s)
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Sleep after a failed cycle before trying again (1s)
pub const ERROR_RECOVERY_SLEEP_DURATION: Duration = Duration::from_secs(1);

/// Default interval between pushes to the remote endpoint (145s)
pub const DEFAULT_UPLOAD_INTERVAL_MS: i64 = 145_000;

/// Default compensation factor for CPU-heat pull-back
pub const DEFAULT_COMPENSATION_FACTOR: f64 = 1.2;

/// Proximity at or above this means the light sensor is covered
pub const PROXIMITY_COVERED_THRESHOLD: u16 = 10;

/// Lux value reported while the light sensor is covered
pub const COVERED_LUX: f64 = 1.0;

/// History window width (one sample per panel pixel column)
pub const HISTORY_WIDTH: usize = 160;
