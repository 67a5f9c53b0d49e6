// Host probe implementation: firmware utility + /proc, with a sysinfo
// thermal fallback for boards without vcgencmd

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use sysinfo::Components;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use airlog_core::port::{HostProbe, HostProbeError};

/// How long a probe command may run before it is abandoned
const COMMAND_TIMEOUT: Duration = Duration::from_secs(2);

/// Probes the board through `vcgencmd`, `/proc/cpuinfo` and `hostname`
pub struct HostProbeImpl {
    cpuinfo_path: PathBuf,
}

impl HostProbeImpl {
    pub fn new() -> Self {
        Self {
            cpuinfo_path: PathBuf::from("/proc/cpuinfo"),
        }
    }

    #[cfg(test)]
    fn with_cpuinfo_path(path: PathBuf) -> Self {
        Self { cpuinfo_path: path }
    }

    async fn run_command(&self, command: &str, args: &[&str]) -> Result<String, HostProbeError> {
        let child = Command::new(command)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| HostProbeError::Command(format!("{}: {}", command, e)))?;

        let output = timeout(COMMAND_TIMEOUT, child.wait_with_output())
            .await
            .map_err(|_| HostProbeError::Command(format!("{}: timed out", command)))?
            .map_err(|e| HostProbeError::Io(e.to_string()))?;

        if !output.status.success() {
            return Err(HostProbeError::Command(format!(
                "{} exited with {:?}",
                command,
                output.status.code()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Hottest CPU-ish component sysinfo can see
    fn thermal_fallback() -> Result<f64, HostProbeError> {
        let components = Components::new_with_refreshed_list();
        components
            .iter()
            .filter(|c| c.label().to_ascii_lowercase().contains("cpu"))
            .map(|c| f64::from(c.temperature()))
            .fold(None, |acc: Option<f64>, t| {
                Some(acc.map_or(t, |a| a.max(t)))
            })
            .ok_or_else(|| {
                HostProbeError::Command("no CPU thermal component found".to_string())
            })
    }
}

impl Default for HostProbeImpl {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse `temp=47.2'C` as emitted by `vcgencmd measure_temp`
fn parse_vcgencmd_temp(output: &str) -> Result<f64, HostProbeError> {
    output
        .trim()
        .strip_prefix("temp=")
        .and_then(|s| s.strip_suffix("'C"))
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| {
            HostProbeError::Parse(format!("unexpected vcgencmd output: {:?}", output))
        })
}

/// Pull the `Serial` line out of /proc/cpuinfo
fn parse_serial(cpuinfo: &str) -> Result<String, HostProbeError> {
    cpuinfo
        .lines()
        .find(|line| line.starts_with("Serial"))
        .and_then(|line| line.split(':').nth(1))
        .map(|serial| serial.trim().to_string())
        .filter(|serial| !serial.is_empty())
        .ok_or_else(|| HostProbeError::Parse("no Serial line in cpuinfo".to_string()))
}

#[async_trait]
impl HostProbe for HostProbeImpl {
    async fn cpu_temperature(&self) -> Result<f64, HostProbeError> {
        match self.run_command("vcgencmd", &["measure_temp"]).await {
            Ok(output) => parse_vcgencmd_temp(&output),
            Err(e) => {
                warn!(error = %e, "vcgencmd unavailable, using thermal fallback");
                Self::thermal_fallback()
            }
        }
    }

    async fn serial_number(&self) -> Result<String, HostProbeError> {
        let cpuinfo = tokio::fs::read_to_string(&self.cpuinfo_path)
            .await
            .map_err(|e| HostProbeError::Io(e.to_string()))?;
        parse_serial(&cpuinfo)
    }

    async fn has_network(&self) -> bool {
        match self.run_command("hostname", &["-I"]).await {
            Ok(output) => {
                let connected = !output.trim().is_empty();
                debug!(connected, "network probe");
                connected
            }
            Err(e) => {
                warn!(error = %e, "hostname probe failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_vcgencmd_output() {
        assert!((parse_vcgencmd_temp("temp=47.2'C\n").unwrap() - 47.2).abs() < 1e-9);
        assert!((parse_vcgencmd_temp("temp=33.0'C").unwrap() - 33.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_malformed_vcgencmd_output() {
        assert!(parse_vcgencmd_temp("").is_err());
        assert!(parse_vcgencmd_temp("temp=abc'C").is_err());
        assert!(parse_vcgencmd_temp("47.2").is_err());
    }

    #[test]
    fn parses_serial_from_cpuinfo() {
        let cpuinfo = "processor\t: 0\nmodel name\t: ARMv7\n\
                       Hardware\t: BCM2835\nSerial\t\t: 00000000a1b2c3d4\n";
        assert_eq!(parse_serial(cpuinfo).unwrap(), "00000000a1b2c3d4");
    }

    #[test]
    fn missing_serial_is_an_error() {
        assert!(parse_serial("processor\t: 0\n").is_err());
        assert!(parse_serial("Serial\t\t:\n").is_err());
    }

    #[tokio::test]
    async fn serial_number_reads_the_configured_path() {
        let dir = std::env::temp_dir().join("airlog_host_probe_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("cpuinfo");
        std::fs::write(&path, "Serial\t\t: 0000feedbeef0001\n").unwrap();

        let probe = HostProbeImpl::with_cpuinfo_path(path);
        assert_eq!(probe.serial_number().await.unwrap(), "0000feedbeef0001");
    }

    #[tokio::test]
    async fn missing_cpuinfo_file_is_an_io_error() {
        let probe = HostProbeImpl::with_cpuinfo_path(PathBuf::from(
            "/nonexistent/airlog/cpuinfo",
        ));
        assert!(matches!(
            probe.serial_number().await,
            Err(HostProbeError::Io(_))
        ));
    }
}
