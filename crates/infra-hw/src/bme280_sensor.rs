// BME280 climate adapter (I2C)

use bme280::BME280;
use chrono::Utc;
use linux_embedded_hal::{Delay, I2cdev};
use tracing::info;

use airlog_core::domain::ClimateReading;
use airlog_core::port::{ClimateSensor, SensorError};

/// Climate sensor on the primary BME280 address (0x76)
pub struct Bme280Climate {
    driver: BME280<I2cdev, Delay>,
}

impl Bme280Climate {
    /// Open and initialize the sensor on the given I2C bus, e.g. `/dev/i2c-1`
    pub fn open(bus_path: &str) -> Result<Self, SensorError> {
        let i2c = I2cdev::new(bus_path).map_err(|e| SensorError::Bus(e.to_string()))?;
        let mut driver = BME280::new_primary(i2c, Delay);
        driver
            .init()
            .map_err(|e| SensorError::Protocol(format!("BME280 init: {:?}", e)))?;
        info!(bus = %bus_path, "BME280 initialized");
        Ok(Self { driver })
    }
}

impl ClimateSensor for Bme280Climate {
    fn read(&mut self) -> Result<ClimateReading, SensorError> {
        let m = self
            .driver
            .measure()
            .map_err(|e| SensorError::Protocol(format!("BME280 measure: {:?}", e)))?;
        Ok(ClimateReading {
            timestamp: Utc::now(),
            temperature_c: f64::from(m.temperature),
            // driver reports pascals
            pressure_hpa: f64::from(m.pressure) / 100.0,
            humidity_percent: f64::from(m.humidity),
        })
    }
}
