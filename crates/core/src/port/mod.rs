// Port Layer - Interfaces for external collaborators

pub mod display;
pub mod host_probe;
pub mod sensor;
pub mod time_provider;
pub mod uploader;

// Re-exports
pub use display::{DisplayError, StatusDisplay};
pub use host_probe::{HostProbe, HostProbeError};
pub use sensor::{
    ClimateSensor, GasSensor, LightSensor, ParticulateSensor, SensorError,
};
pub use time_provider::TimeProvider;
pub use uploader::{UploadError, Uploader};
