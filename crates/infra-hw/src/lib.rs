// Hardware adapters for the Airlog station.
//
// Every adapter implements one core port over a Linux bus handle. Driver
// protocol details stay inside the driver crates; these modules only open
// the bus, call the driver and map values/errors into the domain.

mod bme280_sensor;
mod ltr559_sensor;
mod mics6814_sensor;
mod pms5003_sensor;
mod st7735_display;

pub use bme280_sensor::Bme280Climate;
pub use ltr559_sensor::Ltr559Light;
pub use mics6814_sensor::Mics6814Gas;
pub use pms5003_sensor::Pms5003Particulates;
pub use st7735_display::{PanelPins, St7735Panel};
