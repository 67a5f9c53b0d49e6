// Upload cadence tracking

use std::sync::Arc;

use crate::port::TimeProvider;

/// Decides when the next push to the remote endpoint is due.
///
/// The clock resets on every attempt, successful or not; a failed push
/// waits a full interval rather than hammering the endpoint.
pub struct UploadSchedule {
    interval_ms: i64,
    last_attempt_ms: i64,
    time_provider: Arc<dyn TimeProvider>,
}

impl UploadSchedule {
    pub fn new(interval_ms: i64, time_provider: Arc<dyn TimeProvider>) -> Self {
        let last_attempt_ms = time_provider.now_millis();
        Self {
            interval_ms,
            last_attempt_ms,
            time_provider,
        }
    }

    pub fn is_due(&self) -> bool {
        self.time_provider.now_millis() - self.last_attempt_ms > self.interval_ms
    }

    pub fn mark_attempted(&mut self) {
        self.last_attempt_ms = self.time_provider.now_millis();
    }
}
