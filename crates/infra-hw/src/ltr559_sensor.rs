// LTR-559 light/proximity adapter (I2C)

use chrono::Utc;
use linux_embedded_hal::I2cdev;
use ltr_559::{ic, AlsGain, Ltr559, SlaveAddr};
use tracing::info;

use airlog_core::domain::LightReading;
use airlog_core::port::{LightSensor, SensorError};

/// Ambient light + proximity sensor on the default LTR-559 address
pub struct Ltr559Light {
    driver: Ltr559<I2cdev, ic::Ltr559>,
}

impl Ltr559Light {
    pub fn open(bus_path: &str) -> Result<Self, SensorError> {
        let i2c = I2cdev::new(bus_path).map_err(|e| SensorError::Bus(e.to_string()))?;
        let mut driver = Ltr559::new_device(i2c, SlaveAddr::default());
        driver
            .set_als_contr(AlsGain::Gain4x, false, true)
            .map_err(|e| SensorError::Protocol(format!("LTR-559 ALS setup: {:?}", e)))?;
        driver
            .set_ps_contr(true, true)
            .map_err(|e| SensorError::Protocol(format!("LTR-559 PS setup: {:?}", e)))?;
        info!(bus = %bus_path, "LTR-559 initialized");
        Ok(Self { driver })
    }
}

impl LightSensor for Ltr559Light {
    fn read(&mut self) -> Result<LightReading, SensorError> {
        let lux = self
            .driver
            .get_lux()
            .map_err(|e| SensorError::Protocol(format!("LTR-559 lux: {:?}", e)))?;
        let (proximity, _saturated) = self
            .driver
            .get_ps_data()
            .map_err(|e| SensorError::Protocol(format!("LTR-559 proximity: {:?}", e)))?;
        Ok(LightReading {
            timestamp: Utc::now(),
            lux: f64::from(lux),
            proximity,
        })
    }
}
