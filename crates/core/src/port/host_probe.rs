// Host probe port: facts about the board the station runs on

use async_trait::async_trait;
use thiserror::Error;

/// Host probe failures
#[derive(Error, Debug)]
pub enum HostProbeError {
    #[error("Command failed: {0}")]
    Command(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(String),
}

/// Board-level probes: CPU temperature feeds the temperature compensation,
/// the serial number identifies the station upstream.
#[async_trait]
pub trait HostProbe: Send + Sync {
    /// CPU temperature in degrees Celsius
    async fn cpu_temperature(&self) -> Result<f64, HostProbeError>;

    /// Board serial number (stable station identity)
    async fn serial_number(&self) -> Result<String, HostProbeError>;

    /// Whether the board currently has a network address
    async fn has_network(&self) -> bool;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Mock host probe with a settable CPU temperature
    pub struct MockHostProbe {
        cpu_temp: Arc<Mutex<f64>>,
        serial: String,
    }

    impl MockHostProbe {
        pub fn new(cpu_temp: f64) -> Self {
            Self {
                cpu_temp: Arc::new(Mutex::new(cpu_temp)),
                serial: "00000000deadbeef".to_string(),
            }
        }

        pub fn set_cpu_temperature(&self, value: f64) {
            *self.cpu_temp.lock().unwrap() = value;
        }
    }

    #[async_trait]
    impl HostProbe for MockHostProbe {
        async fn cpu_temperature(&self) -> Result<f64, HostProbeError> {
            Ok(*self.cpu_temp.lock().unwrap())
        }

        async fn serial_number(&self) -> Result<String, HostProbeError> {
            Ok(self.serial.clone())
        }

        async fn has_network(&self) -> bool {
            true
        }
    }
}
