// Sensor ports: one narrow trait per physical device.
//
// Reads are blocking bus transactions (I2C, ADC, UART) and stay synchronous;
// the station loop tolerates the few milliseconds each takes.

use thiserror::Error;

use crate::domain::{ClimateReading, GasReading, LightReading, ParticulateReading};

/// Sensor failures surfaced by adapters
#[derive(Error, Debug)]
pub enum SensorError {
    /// The device did not produce a frame within its read window.
    /// The sampler answers this with a reset and a single retry.
    #[error("Sensor read timed out")]
    Timeout,

    #[error("Bus error: {0}")]
    Bus(String),

    #[error("Protocol error: {0}")]
    Protocol(String),
}

/// Temperature / pressure / humidity sensor
pub trait ClimateSensor: Send + Sync {
    /// Read one raw measurement (uncompensated die temperature)
    fn read(&mut self) -> Result<ClimateReading, SensorError>;
}

/// Ambient light + proximity sensor
pub trait LightSensor: Send + Sync {
    fn read(&mut self) -> Result<LightReading, SensorError>;
}

/// Gas sensor (oxidising / reducing / NH3 channel resistances)
pub trait GasSensor: Send + Sync {
    fn read(&mut self) -> Result<GasReading, SensorError>;
}

/// Particulate matter sensor
pub trait ParticulateSensor: Send + Sync {
    fn read(&mut self) -> Result<ParticulateReading, SensorError>;

    /// Hardware reset, used after a read timeout before the retry
    fn reset(&mut self) -> Result<(), SensorError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use chrono::Utc;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Mock climate sensor returning a fixed reading, with optional
    /// scripted failures for resilience tests
    pub struct MockClimateSensor {
        reading: ClimateReading,
        fail_next: Arc<Mutex<u32>>,
        calls: Arc<Mutex<u32>>,
    }

    impl MockClimateSensor {
        pub fn new(temperature_c: f64, pressure_hpa: f64, humidity_percent: f64) -> Self {
            Self {
                reading: ClimateReading {
                    timestamp: Utc::now(),
                    temperature_c,
                    pressure_hpa,
                    humidity_percent,
                },
                fail_next: Arc::new(Mutex::new(0)),
                calls: Arc::new(Mutex::new(0)),
            }
        }

        /// Fail the next `n` reads with a bus error
        pub fn fail_next(&self, n: u32) {
            *self.fail_next.lock().unwrap() = n;
        }

        /// Handle for asserting on call counts after the sensor is boxed
        pub fn counters(&self) -> (Arc<Mutex<u32>>, Arc<Mutex<u32>>) {
            (self.calls.clone(), self.fail_next.clone())
        }
    }

    impl ClimateSensor for MockClimateSensor {
        fn read(&mut self) -> Result<ClimateReading, SensorError> {
            *self.calls.lock().unwrap() += 1;
            let mut fail = self.fail_next.lock().unwrap();
            if *fail > 0 {
                *fail -= 1;
                return Err(SensorError::Bus("mock climate failure".to_string()));
            }
            Ok(self.reading.clone())
        }
    }

    /// Mock light sensor with a settable proximity (for covered-sensor tests)
    pub struct MockLightSensor {
        lux: f64,
        proximity: Arc<Mutex<u16>>,
    }

    impl MockLightSensor {
        pub fn new(lux: f64) -> Self {
            Self {
                lux,
                proximity: Arc::new(Mutex::new(0)),
            }
        }

        pub fn proximity_handle(&self) -> Arc<Mutex<u16>> {
            self.proximity.clone()
        }
    }

    impl LightSensor for MockLightSensor {
        fn read(&mut self) -> Result<LightReading, SensorError> {
            Ok(LightReading {
                timestamp: Utc::now(),
                lux: self.lux,
                proximity: *self.proximity.lock().unwrap(),
            })
        }
    }

    /// Mock gas sensor returning fixed channel resistances (ohms)
    pub struct MockGasSensor {
        oxidising_ohms: f64,
        reducing_ohms: f64,
        nh3_ohms: f64,
    }

    impl MockGasSensor {
        pub fn new(oxidising_ohms: f64, reducing_ohms: f64, nh3_ohms: f64) -> Self {
            Self {
                oxidising_ohms,
                reducing_ohms,
                nh3_ohms,
            }
        }
    }

    impl GasSensor for MockGasSensor {
        fn read(&mut self) -> Result<GasReading, SensorError> {
            Ok(GasReading {
                timestamp: Utc::now(),
                oxidising_ohms: self.oxidising_ohms,
                reducing_ohms: self.reducing_ohms,
                nh3_ohms: self.nh3_ohms,
            })
        }
    }

    /// Scripted particulate sensor: pops one result per read, counts resets.
    /// An empty script yields a fixed nominal reading.
    pub struct MockParticulateSensor {
        script: Arc<Mutex<VecDeque<Result<ParticulateReading, SensorError>>>>,
        resets: Arc<Mutex<u32>>,
    }

    impl MockParticulateSensor {
        pub fn new() -> Self {
            Self {
                script: Arc::new(Mutex::new(VecDeque::new())),
                resets: Arc::new(Mutex::new(0)),
            }
        }

        pub fn push_timeout(&self) {
            self.script
                .lock()
                .unwrap()
                .push_back(Err(SensorError::Timeout));
        }

        pub fn push_reading(&self, pm1: u16, pm2_5: u16, pm10: u16) {
            self.script.lock().unwrap().push_back(Ok(ParticulateReading {
                timestamp: Utc::now(),
                pm1,
                pm2_5,
                pm10,
            }));
        }

        pub fn reset_count(&self) -> Arc<Mutex<u32>> {
            self.resets.clone()
        }
    }

    impl Default for MockParticulateSensor {
        fn default() -> Self {
            Self::new()
        }
    }

    impl ParticulateSensor for MockParticulateSensor {
        fn read(&mut self) -> Result<ParticulateReading, SensorError> {
            match self.script.lock().unwrap().pop_front() {
                Some(result) => result,
                None => Ok(ParticulateReading {
                    timestamp: Utc::now(),
                    pm1: 2,
                    pm2_5: 5,
                    pm10: 9,
                }),
            }
        }

        fn reset(&mut self) -> Result<(), SensorError> {
            *self.resets.lock().unwrap() += 1;
            Ok(())
        }
    }
}
