// PMS5003 particulate adapter (UART).
//
// The sensor streams 32-byte frames: 0x42 0x4D magic, big-endian payload
// length (28), thirteen big-endian u16 fields, and a checksum over every
// preceding byte. Fields 3..=5 are the atmospheric-environment ug/m3
// concentrations the station reports.

use std::io::Read;
use std::thread;
use std::time::Duration;

use chrono::Utc;
use linux_embedded_hal::sysfs_gpio::Direction;
use linux_embedded_hal::Pin;
use serialport::{ClearBuffer, SerialPort, TTYPort};
use tracing::{debug, info};

use airlog_core::domain::ParticulateReading;
use airlog_core::port::{ParticulateSensor, SensorError};

const BAUD_RATE: u32 = 9600;
const READ_TIMEOUT: Duration = Duration::from_secs(5);
/// Expected payload length field for a data frame
const DATA_FRAME_LEN: u16 = 28;
/// How long the reset line is held low
const RESET_PULSE: Duration = Duration::from_millis(100);
/// Sensor boot time after a reset before frames are valid again
const RESET_SETTLE: Duration = Duration::from_millis(500);

/// Particulate sensor on a serial device, with an optional GPIO reset line
pub struct Pms5003Particulates {
    // Concrete TTYPort (not Box<dyn SerialPort>) so the adapter is Sync, which
    // the station's single spawned task requires; behavior is identical.
    port: TTYPort,
    reset_pin: Option<Pin>,
}

impl Pms5003Particulates {
    /// Open the sensor, e.g. on `/dev/ttyAMA0`, with `reset_gpio` wired to
    /// the sensor's reset input (GPIO 27 on the Enviro+ board)
    pub fn open(device: &str, reset_gpio: Option<u64>) -> Result<Self, SensorError> {
        let port = serialport::new(device, BAUD_RATE)
            .timeout(READ_TIMEOUT)
            .open_native()
            .map_err(|e| SensorError::Bus(e.to_string()))?;

        let reset_pin = match reset_gpio {
            Some(number) => {
                let pin = Pin::new(number);
                pin.export().map_err(|e| SensorError::Bus(e.to_string()))?;
                pin.set_direction(Direction::High)
                    .map_err(|e| SensorError::Bus(e.to_string()))?;
                Some(pin)
            }
            None => None,
        };

        info!(device = %device, reset_gpio = ?reset_gpio, "PMS5003 opened");
        Ok(Self { port, reset_pin })
    }

    /// Read bytes until a full frame arrives, mapping serial timeouts to
    /// the port-level timeout error the sampler reacts to
    fn read_frame(&mut self) -> Result<ParticulateReading, SensorError> {
        // Scan for the two magic bytes, then pull the remaining 30
        loop {
            let b = self.read_byte()?;
            if b != 0x42 {
                continue;
            }
            if self.read_byte()? != 0x4D {
                continue;
            }

            let mut rest = [0u8; 30];
            self.port
                .read_exact(&mut rest)
                .map_err(map_io_error)?;
            return parse_frame(&rest);
        }
    }

    fn read_byte(&mut self) -> Result<u8, SensorError> {
        let mut buf = [0u8; 1];
        self.port.read_exact(&mut buf).map_err(map_io_error)?;
        Ok(buf[0])
    }
}

fn map_io_error(e: std::io::Error) -> SensorError {
    match e.kind() {
        // UnexpectedEof is how a read window with zero bytes surfaces
        std::io::ErrorKind::TimedOut | std::io::ErrorKind::UnexpectedEof => SensorError::Timeout,
        _ => SensorError::Bus(e.to_string()),
    }
}

/// Parse the 30 bytes following the magic: length, payload, checksum
fn parse_frame(rest: &[u8; 30]) -> Result<ParticulateReading, SensorError> {
    let frame_len = u16::from_be_bytes([rest[0], rest[1]]);
    if frame_len != DATA_FRAME_LEN {
        return Err(SensorError::Protocol(format!(
            "unexpected frame length {}",
            frame_len
        )));
    }

    let expected = u16::from_be_bytes([rest[28], rest[29]]);
    let mut sum = 0x42u16.wrapping_add(0x4D);
    for b in &rest[..28] {
        sum = sum.wrapping_add(u16::from(*b));
    }
    if sum != expected {
        return Err(SensorError::Protocol(format!(
            "checksum mismatch: got {:#06x}, want {:#06x}",
            sum, expected
        )));
    }

    let field = |i: usize| u16::from_be_bytes([rest[2 + 2 * i], rest[3 + 2 * i]]);
    Ok(ParticulateReading {
        timestamp: Utc::now(),
        pm1: field(3),
        pm2_5: field(4),
        pm10: field(5),
    })
}

impl ParticulateSensor for Pms5003Particulates {
    fn read(&mut self) -> Result<ParticulateReading, SensorError> {
        let reading = self.read_frame()?;
        debug!(
            pm1 = %reading.pm1,
            pm2_5 = %reading.pm2_5,
            pm10 = %reading.pm10,
            "PMS5003 frame"
        );
        Ok(reading)
    }

    fn reset(&mut self) -> Result<(), SensorError> {
        if let Some(pin) = &self.reset_pin {
            pin.set_value(0).map_err(|e| SensorError::Bus(e.to_string()))?;
            thread::sleep(RESET_PULSE);
            pin.set_value(1).map_err(|e| SensorError::Bus(e.to_string()))?;
            thread::sleep(RESET_SETTLE);
        }
        // Stale bytes from before the reset would desync the frame scan
        self.port
            .clear(ClearBuffer::Input)
            .map_err(|e| SensorError::Bus(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build the 30 post-magic bytes for the given 13 fields
    fn frame_bytes(fields: [u16; 13]) -> [u8; 30] {
        let mut rest = [0u8; 30];
        rest[0..2].copy_from_slice(&DATA_FRAME_LEN.to_be_bytes());
        for (i, f) in fields.iter().enumerate() {
            rest[2 + 2 * i..4 + 2 * i].copy_from_slice(&f.to_be_bytes());
        }
        let mut sum = 0x42u16 + 0x4D;
        for b in &rest[..28] {
            sum = sum.wrapping_add(u16::from(*b));
        }
        rest[28..30].copy_from_slice(&sum.to_be_bytes());
        rest
    }

    #[test]
    fn parses_atmospheric_fields() {
        let mut fields = [0u16; 13];
        fields[0] = 10; // cf=1 values, ignored
        fields[1] = 20;
        fields[2] = 30;
        fields[3] = 4; // pm1 atm
        fields[4] = 8; // pm2.5 atm
        fields[5] = 15; // pm10 atm

        let reading = parse_frame(&frame_bytes(fields)).unwrap();
        assert_eq!(reading.pm1, 4);
        assert_eq!(reading.pm2_5, 8);
        assert_eq!(reading.pm10, 15);
    }

    #[test]
    fn rejects_bad_checksum() {
        let mut rest = frame_bytes([0; 13]);
        rest[29] ^= 0xFF;
        assert!(matches!(
            parse_frame(&rest),
            Err(SensorError::Protocol(_))
        ));
    }

    #[test]
    fn rejects_unexpected_length() {
        let mut rest = frame_bytes([0; 13]);
        rest[1] = 20;
        assert!(matches!(
            parse_frame(&rest),
            Err(SensorError::Protocol(_))
        ));
    }
}
