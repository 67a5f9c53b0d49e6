// Network adapters for the Airlog station

mod luftdaten;

pub use luftdaten::{LuftdatenClient, DEFAULT_ENDPOINT};
