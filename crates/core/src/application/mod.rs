// Application Layer - sampling, compensation, cadence and the station loop

pub mod compensation;
pub mod history;
pub mod sampler;
pub mod station;
pub mod uplink;

pub use compensation::TemperatureCompensator;
pub use history::HistoryBank;
pub use sampler::Sampler;
pub use station::{Station, StationSettings};
pub use uplink::UploadSchedule;
