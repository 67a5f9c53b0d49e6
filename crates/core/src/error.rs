// Central Error Type for the Application

use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Sensor error: {0}")]
    Sensor(#[from] crate::port::SensorError),

    #[error("Display error: {0}")]
    Display(#[from] crate::port::DisplayError),

    #[error("Upload error: {0}")]
    Upload(#[from] crate::port::UploadError),

    #[error("Host probe error: {0}")]
    HostProbe(#[from] crate::port::HostProbeError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
