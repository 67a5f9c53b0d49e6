// Status display port

use thiserror::Error;

use crate::domain::Frame;

/// Display failures surfaced by adapters
#[derive(Error, Debug)]
pub enum DisplayError {
    #[error("Bus error: {0}")]
    Bus(String),

    #[error("Draw error: {0}")]
    Draw(String),
}

/// The small attached panel. One call renders one complete frame.
pub trait StatusDisplay: Send + Sync {
    fn show(&mut self, frame: &Frame) -> Result<(), DisplayError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Records every frame it is asked to show
    pub struct MockStatusDisplay {
        frames: Arc<Mutex<Vec<Frame>>>,
    }

    impl MockStatusDisplay {
        pub fn new() -> Self {
            Self {
                frames: Arc::new(Mutex::new(Vec::new())),
            }
        }

        /// Handle for inspecting rendered frames after the display is boxed
        pub fn frames(&self) -> Arc<Mutex<Vec<Frame>>> {
            self.frames.clone()
        }
    }

    impl Default for MockStatusDisplay {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StatusDisplay for MockStatusDisplay {
        fn show(&mut self, frame: &Frame) -> Result<(), DisplayError> {
            self.frames.lock().unwrap().push(frame.clone());
            Ok(())
        }
    }
}
