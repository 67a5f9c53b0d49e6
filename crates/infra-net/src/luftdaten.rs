// Luftdaten / sensor.community push client.
//
// One sample becomes two POSTs against the same endpoint: the particulate
// values under sensor pin 1 and the climate values under pin 11. The
// station only counts the push as successful if both land.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use airlog_core::domain::UploadSample;
use airlog_core::port::{UploadError, Uploader};

pub const DEFAULT_ENDPOINT: &str = "https://api.luftdaten.info/v1/push-sensor-data/";

/// Sensor pin for the particulate payload
const PM_PIN: &str = "1";
/// Sensor pin for the climate payload
const CLIMATE_PIN: &str = "11";

const HTTP_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Serialize)]
struct SensorDataValue {
    value_type: &'static str,
    value: String,
}

#[derive(Debug, Serialize)]
struct PushPayload {
    software_version: String,
    sensordatavalues: Vec<SensorDataValue>,
}

/// HTTP push client for the citizen-science endpoint
pub struct LuftdatenClient {
    http: reqwest::Client,
    endpoint: String,
    software_version: String,
}

impl LuftdatenClient {
    pub fn new(endpoint: impl Into<String>, software_version: impl Into<String>) -> Result<Self, UploadError> {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| UploadError::Http(e.to_string()))?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            software_version: software_version.into(),
        })
    }

    fn particulate_payload(&self, sample: &UploadSample) -> PushPayload {
        PushPayload {
            software_version: self.software_version.clone(),
            sensordatavalues: vec![
                SensorDataValue {
                    value_type: "P1",
                    value: sample.pm10.to_string(),
                },
                SensorDataValue {
                    value_type: "P2",
                    value: sample.pm2_5.to_string(),
                },
            ],
        }
    }

    fn climate_payload(&self, sample: &UploadSample) -> PushPayload {
        PushPayload {
            software_version: self.software_version.clone(),
            sensordatavalues: vec![
                SensorDataValue {
                    value_type: "temperature",
                    value: format!("{:.2}", sample.temperature_c),
                },
                SensorDataValue {
                    value_type: "pressure",
                    value: format!("{:.2}", sample.pressure_pa),
                },
                SensorDataValue {
                    value_type: "humidity",
                    value: format!("{:.2}", sample.humidity_percent),
                },
            ],
        }
    }

    async fn post(
        &self,
        pin: &'static str,
        payload: &PushPayload,
        station_id: &str,
    ) -> Result<(), UploadError> {
        let response = self
            .http
            .post(&self.endpoint)
            .header("X-PIN", pin)
            .header("X-Sensor", station_id)
            .header("cache-control", "no-cache")
            .json(payload)
            .send()
            .await
            .map_err(|e| UploadError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UploadError::Rejected {
                pin,
                status: status.as_u16(),
            });
        }
        debug!(pin, status = %status, "payload accepted");
        Ok(())
    }
}

#[async_trait]
impl Uploader for LuftdatenClient {
    async fn push(&self, sample: &UploadSample, station_id: &str) -> Result<(), UploadError> {
        let pm = self.particulate_payload(sample);
        let climate = self.climate_payload(sample);
        tokio::try_join!(
            self.post(PM_PIN, &pm, station_id),
            self.post(CLIMATE_PIN, &climate, station_id),
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> UploadSample {
        UploadSample {
            temperature_c: 21.367,
            pressure_pa: 100_950.0,
            humidity_percent: 48.25,
            pm2_5: 7,
            pm10: 12,
        }
    }

    fn client() -> LuftdatenClient {
        LuftdatenClient::new(DEFAULT_ENDPOINT, "airlog 0.1.0").unwrap()
    }

    #[test]
    fn particulate_payload_uses_pin1_value_types() {
        let payload = client().particulate_payload(&sample());
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["software_version"], "airlog 0.1.0");
        assert_eq!(json["sensordatavalues"][0]["value_type"], "P1");
        assert_eq!(json["sensordatavalues"][0]["value"], "12");
        assert_eq!(json["sensordatavalues"][1]["value_type"], "P2");
        assert_eq!(json["sensordatavalues"][1]["value"], "7");
    }

    #[test]
    fn climate_payload_formats_two_decimals() {
        let payload = client().climate_payload(&sample());
        let json = serde_json::to_value(&payload).unwrap();
        let values = json["sensordatavalues"].as_array().unwrap();
        assert_eq!(values.len(), 3);
        assert_eq!(values[0]["value_type"], "temperature");
        assert_eq!(values[0]["value"], "21.37");
        assert_eq!(values[1]["value_type"], "pressure");
        assert_eq!(values[1]["value"], "100950.00");
        assert_eq!(values[2]["value_type"], "humidity");
        assert_eq!(values[2]["value"], "48.25");
    }
}
