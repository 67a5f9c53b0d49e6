// Uploader port: pushes aggregated readings to the citizen-science endpoint

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::UploadSample;

/// Upload failures surfaced by adapters
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Endpoint rejected pin {pin}: status {status}")]
    Rejected { pin: &'static str, status: u16 },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Remote push of one sample. Implementations decide how the sample is
/// split into payloads; the call succeeds only if the whole push succeeded.
#[async_trait]
pub trait Uploader: Send + Sync {
    async fn push(&self, sample: &UploadSample, station_id: &str) -> Result<(), UploadError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Records pushes; optionally fails every attempt
    pub struct MockUploader {
        pushes: Arc<Mutex<Vec<(UploadSample, String)>>>,
        fail: Arc<Mutex<bool>>,
    }

    impl MockUploader {
        pub fn new() -> Self {
            Self {
                pushes: Arc::new(Mutex::new(Vec::new())),
                fail: Arc::new(Mutex::new(false)),
            }
        }

        pub fn set_failing(&self, failing: bool) {
            *self.fail.lock().unwrap() = failing;
        }

        pub fn pushes(&self) -> Arc<Mutex<Vec<(UploadSample, String)>>> {
            self.pushes.clone()
        }
    }

    impl Default for MockUploader {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl Uploader for MockUploader {
        async fn push(&self, sample: &UploadSample, station_id: &str) -> Result<(), UploadError> {
            if *self.fail.lock().unwrap() {
                return Err(UploadError::Http("mock upload failure".to_string()));
            }
            self.pushes
                .lock()
                .unwrap()
                .push((sample.clone(), station_id.to_string()));
            Ok(())
        }
    }
}
