// Domain Layer - metric catalog, sensor readings, display frames

mod frame;
mod metric;
mod reading;

pub use frame::{Frame, FrameLine, ViewMode};
pub use metric::{Metric, WarningLevel};
pub use reading::{
    ClimateReading, GasReading, LightReading, ParticulateReading, Snapshot, UploadSample,
};
