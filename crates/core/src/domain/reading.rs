// Sensor reading types and the per-cycle snapshot

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Metric;

/// Climate values from the temperature/pressure/humidity sensor.
///
/// `temperature_c` is the compensated value when carried inside a
/// [`Snapshot`]; adapters report the raw die temperature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateReading {
    pub timestamp: DateTime<Utc>,
    pub temperature_c: f64,
    pub pressure_hpa: f64,
    pub humidity_percent: f64,
}

/// Ambient light and proximity from the light sensor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightReading {
    pub timestamp: DateTime<Utc>,
    pub lux: f64,
    pub proximity: u16,
}

/// Channel resistances from the gas sensor, in ohms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GasReading {
    pub timestamp: DateTime<Utc>,
    pub oxidising_ohms: f64,
    pub reducing_ohms: f64,
    pub nh3_ohms: f64,
}

/// Particulate concentrations in ug/m3 (atmospheric environment values)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticulateReading {
    pub timestamp: DateTime<Utc>,
    pub pm1: u16,
    pub pm2_5: u16,
    pub pm10: u16,
}

/// One polling cycle's worth of values across all sensors.
///
/// The climate temperature has already been compensated for CPU heat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub climate: ClimateReading,
    pub light: LightReading,
    pub gas: GasReading,
    pub particulates: ParticulateReading,
}

impl Snapshot {
    /// Value for a metric in its display unit (gas in kOhm)
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Temperature => self.climate.temperature_c,
            Metric::Pressure => self.climate.pressure_hpa,
            Metric::Humidity => self.climate.humidity_percent,
            Metric::Light => self.light.lux,
            Metric::Oxidising => self.gas.oxidising_ohms / 1000.0,
            Metric::Reducing => self.gas.reducing_ohms / 1000.0,
            Metric::Nh3 => self.gas.nh3_ohms / 1000.0,
            Metric::Pm1 => f64::from(self.particulates.pm1),
            Metric::Pm25 => f64::from(self.particulates.pm2_5),
            Metric::Pm10 => f64::from(self.particulates.pm10),
        }
    }

    /// Reduce the snapshot to the fields the remote endpoint accepts
    pub fn upload_sample(&self) -> UploadSample {
        UploadSample {
            temperature_c: self.climate.temperature_c,
            pressure_pa: self.climate.pressure_hpa * 100.0,
            humidity_percent: self.climate.humidity_percent,
            pm2_5: self.particulates.pm2_5,
            pm10: self.particulates.pm10,
        }
    }
}

/// The subset of a snapshot pushed to the citizen-science endpoint.
///
/// Pressure is converted to pascals here; everything upstream works in hPa.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadSample {
    pub temperature_c: f64,
    pub pressure_pa: f64,
    pub humidity_percent: f64,
    pub pm2_5: u16,
    pub pm10: u16,
}
