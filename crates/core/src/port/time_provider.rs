// Time Provider Port (for testability of the upload cadence)

/// Time provider interface (allows mocking in tests)
pub trait TimeProvider: Send + Sync {
    /// Get current time in milliseconds since epoch
    fn now_millis(&self) -> i64;
}

/// System time provider (production)
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Manually advanced clock for cadence tests
    #[derive(Clone)]
    pub struct MockTimeProvider {
        now: Arc<Mutex<i64>>,
    }

    impl MockTimeProvider {
        pub fn new(start_millis: i64) -> Self {
            Self {
                now: Arc::new(Mutex::new(start_millis)),
            }
        }

        pub fn advance(&self, millis: i64) {
            *self.now.lock().unwrap() += millis;
        }
    }

    impl TimeProvider for MockTimeProvider {
        fn now_millis(&self) -> i64 {
            *self.now.lock().unwrap()
        }
    }
}
