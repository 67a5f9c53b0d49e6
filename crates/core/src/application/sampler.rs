// One polling pass over every sensor

use std::sync::Arc;

use tracing::warn;

use crate::application::compensation::TemperatureCompensator;
use crate::application::station::constants::{COVERED_LUX, PROXIMITY_COVERED_THRESHOLD};
use crate::domain::{ParticulateReading, Snapshot};
use crate::error::Result;
use crate::port::{
    ClimateSensor, GasSensor, HostProbe, LightSensor, ParticulateSensor, SensorError,
};

/// Owns the sensors and produces one [`Snapshot`] per cycle
pub struct Sampler {
    climate: Box<dyn ClimateSensor>,
    light: Box<dyn LightSensor>,
    gas: Box<dyn GasSensor>,
    particulates: Box<dyn ParticulateSensor>,
    host_probe: Arc<dyn HostProbe>,
    compensator: TemperatureCompensator,
}

impl Sampler {
    pub fn new(
        climate: Box<dyn ClimateSensor>,
        light: Box<dyn LightSensor>,
        gas: Box<dyn GasSensor>,
        particulates: Box<dyn ParticulateSensor>,
        host_probe: Arc<dyn HostProbe>,
        compensation_factor: f64,
    ) -> Self {
        Self {
            climate,
            light,
            gas,
            particulates,
            host_probe,
            compensator: TemperatureCompensator::new(compensation_factor),
        }
    }

    /// Read all sensors once, compensating the temperature for CPU heat
    pub async fn sample(&mut self) -> Result<Snapshot> {
        let cpu_temp = self.host_probe.cpu_temperature().await?;

        let mut climate = self.climate.read()?;
        climate.temperature_c = self
            .compensator
            .compensate(climate.temperature_c, cpu_temp);

        let mut light = self.light.read()?;
        // A close proximity reading means the sensor is covered
        if light.proximity >= PROXIMITY_COVERED_THRESHOLD {
            light.lux = COVERED_LUX;
        }

        let gas = self.gas.read()?;
        let particulates = self.read_particulates()?;

        Ok(Snapshot {
            climate,
            light,
            gas,
            particulates,
        })
    }

    /// Particulate read with the timeout rule: reset the sensor and retry
    /// exactly once, then propagate
    fn read_particulates(&mut self) -> std::result::Result<ParticulateReading, SensorError> {
        match self.particulates.read() {
            Err(SensorError::Timeout) => {
                warn!("Particulate sensor timed out, resetting and retrying");
                self.particulates.reset()?;
                self.particulates.read()
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::host_probe::mocks::MockHostProbe;
    use crate::port::sensor::mocks::{
        MockClimateSensor, MockGasSensor, MockLightSensor, MockParticulateSensor,
    };

    fn sampler_with(particulates: MockParticulateSensor) -> Sampler {
        Sampler::new(
            Box::new(MockClimateSensor::new(22.0, 1010.0, 45.0)),
            Box::new(MockLightSensor::new(150.0)),
            Box::new(MockGasSensor::new(11_000.0, 420_000.0, 95_000.0)),
            Box::new(particulates),
            Arc::new(MockHostProbe::new(46.0)),
            1.2,
        )
    }

    #[tokio::test]
    async fn sample_compensates_temperature() {
        let mut sampler = sampler_with(MockParticulateSensor::new());
        let snapshot = sampler.sample().await.unwrap();
        // 22 - (46 - 22) / 1.2 = 2.0
        assert!((snapshot.climate.temperature_c - 2.0).abs() < 1e-9);
        assert!((snapshot.climate.pressure_hpa - 1010.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn covered_light_sensor_clamps_lux() {
        let light = MockLightSensor::new(150.0);
        let proximity = light.proximity_handle();
        let mut sampler = Sampler::new(
            Box::new(MockClimateSensor::new(22.0, 1010.0, 45.0)),
            Box::new(light),
            Box::new(MockGasSensor::new(11_000.0, 420_000.0, 95_000.0)),
            Box::new(MockParticulateSensor::new()),
            Arc::new(MockHostProbe::new(46.0)),
            1.2,
        );

        let snapshot = sampler.sample().await.unwrap();
        assert!((snapshot.light.lux - 150.0).abs() < 1e-9);

        *proximity.lock().unwrap() = 200;
        let snapshot = sampler.sample().await.unwrap();
        assert!((snapshot.light.lux - COVERED_LUX).abs() < 1e-9);
    }

    #[tokio::test]
    async fn particulate_timeout_resets_then_retries() {
        let particulates = MockParticulateSensor::new();
        particulates.push_timeout();
        particulates.push_reading(4, 8, 15);
        let resets = particulates.reset_count();

        let mut sampler = sampler_with(particulates);
        let snapshot = sampler.sample().await.unwrap();

        assert_eq!(snapshot.particulates.pm2_5, 8);
        assert_eq!(*resets.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn second_particulate_timeout_propagates() {
        let particulates = MockParticulateSensor::new();
        particulates.push_timeout();
        particulates.push_timeout();
        let resets = particulates.reset_count();

        let mut sampler = sampler_with(particulates);
        let result = sampler.sample().await;

        assert!(matches!(
            result,
            Err(crate::AppError::Sensor(SensorError::Timeout))
        ));
        assert_eq!(*resets.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn climate_failure_surfaces_as_error() {
        let climate = MockClimateSensor::new(22.0, 1010.0, 45.0);
        climate.fail_next(1);
        let mut sampler = Sampler::new(
            Box::new(climate),
            Box::new(MockLightSensor::new(150.0)),
            Box::new(MockGasSensor::new(11_000.0, 420_000.0, 95_000.0)),
            Box::new(MockParticulateSensor::new()),
            Arc::new(MockHostProbe::new(46.0)),
            1.2,
        );
        assert!(sampler.sample().await.is_err());
    }
}
