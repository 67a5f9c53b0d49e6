// MICS6814 gas adapter. The sensor's three channels hang off an ADS1015
// ADC; channel voltage is converted to the sense resistance against the
// 56k load resistor.

use ads1x1x::ic::{Ads1015, Resolution12Bit};
use ads1x1x::interface::I2cInterface;
use ads1x1x::mode::OneShot;
use ads1x1x::{channel, Ads1x1x, FullScaleRange, SlaveAddr};
use chrono::Utc;
use embedded_hal::adc::OneShot as _;
use linux_embedded_hal::I2cdev;
use nb::block;
use tracing::info;

use airlog_core::domain::GasReading;
use airlog_core::port::{GasSensor, SensorError};

/// Supply rail the channels divide against
const VREF: f64 = 3.3;
/// Load resistor on each channel, ohms
const LOAD_OHMS: f64 = 56_000.0;
/// Full-scale range is 6.144V over the 12-bit signed code space
const VOLTS_PER_CODE: f64 = 6.144 / 2048.0;

type GasAdc = Ads1x1x<I2cInterface<I2cdev>, Ads1015, Resolution12Bit, OneShot>;

enum GasChannel {
    Oxidising,
    Reducing,
    Nh3,
}

/// Gas sensor behind the ADS1015 at 0x49 (ADDR tied to VDD)
pub struct Mics6814Gas {
    adc: GasAdc,
}

impl Mics6814Gas {
    pub fn open(bus_path: &str) -> Result<Self, SensorError> {
        let i2c = I2cdev::new(bus_path).map_err(|e| SensorError::Bus(e.to_string()))?;
        let mut adc = Ads1x1x::new_ads1015(i2c, SlaveAddr::Alternative(false, true));
        adc.set_full_scale_range(FullScaleRange::Within6_144V)
            .map_err(|e| SensorError::Protocol(format!("ADS1015 range: {:?}", e)))?;
        info!(bus = %bus_path, "ADS1015 gas ADC initialized");
        Ok(Self { adc })
    }

    fn read_ohms(&mut self, ch: GasChannel) -> Result<f64, SensorError> {
        let code = match ch {
            GasChannel::Oxidising => block!(self.adc.read(&mut channel::SingleA0)),
            GasChannel::Reducing => block!(self.adc.read(&mut channel::SingleA1)),
            GasChannel::Nh3 => block!(self.adc.read(&mut channel::SingleA2)),
        }
        .map_err(|e| SensorError::Protocol(format!("ADS1015 read: {:?}", e)))?;

        let volts = f64::from(code) * VOLTS_PER_CODE;
        Ok(channel_resistance(volts))
    }
}

/// Sense resistance from the measured divider voltage
fn channel_resistance(volts: f64) -> f64 {
    if volts >= VREF {
        // Rail-clamped reading; the divider math would go negative
        return f64::INFINITY;
    }
    volts * LOAD_OHMS / (VREF - volts)
}

impl GasSensor for Mics6814Gas {
    fn read(&mut self) -> Result<GasReading, SensorError> {
        Ok(GasReading {
            timestamp: Utc::now(),
            oxidising_ohms: self.read_ohms(GasChannel::Oxidising)?,
            reducing_ohms: self.read_ohms(GasChannel::Reducing)?,
            nh3_ohms: self.read_ohms(GasChannel::Nh3)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resistance_tracks_divider_voltage() {
        // Half rail: R equals the load resistor
        let r = channel_resistance(VREF / 2.0);
        assert!((r - LOAD_OHMS).abs() < 1e-6);

        // Low voltage means low resistance
        assert!(channel_resistance(0.1) < channel_resistance(1.0));
    }

    #[test]
    fn rail_clamped_voltage_does_not_go_negative() {
        assert!(channel_resistance(VREF).is_infinite());
        assert!(channel_resistance(3.4).is_infinite());
    }
}
