// Layered configuration: defaults -> optional TOML file -> AIRLOG_* env -> CLI

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;

use airlog_core::application::station::constants::{
    DEFAULT_COMPENSATION_FACTOR, DEFAULT_UPLOAD_INTERVAL_MS,
};
use airlog_core::application::StationSettings;
use airlog_core::domain::ViewMode;

/// Command-line surface; everything here can also come from the
/// config file or environment
#[derive(Parser)]
#[command(name = "airlogd")]
#[command(about = "Airlog environmental station daemon", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file (default: the platform config dir)
    #[arg(long, env = "AIRLOG_CONFIG")]
    pub config: Option<String>,

    /// Sample and render without pushing upstream
    #[arg(long)]
    pub dry_run: bool,

    /// Log format: pretty or json
    #[arg(long, env = "AIRLOG_LOG_FORMAT")]
    pub log_format: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    // Buses and wiring
    pub i2c_bus: String,
    pub uart_device: String,
    pub spi_device: String,
    pub spi_hz: u32,
    pub lcd_dc_pin: u64,
    pub lcd_reset_pin: u64,
    pub lcd_backlight_pin: u64,
    pub pms_reset_pin: Option<u64>,

    // Loop cadence
    pub poll_interval_secs: u64,
    pub upload_interval_secs: u64,
    pub compensation_factor: f64,

    // Upstream
    pub endpoint: String,
    pub software_version: String,

    // Panel
    pub display_mode: String,
    pub graph_metric: String,

    // Runtime
    pub dry_run: bool,
    pub log_format: String,
    pub log_dir: Option<String>,
}

impl Settings {
    pub fn load(cli: &Cli) -> Result<Self> {
        let file_path = match &cli.config {
            Some(path) => shellexpand::tilde(path).into_owned(),
            None => default_config_path(),
        };

        let builder = config::Config::builder()
            .set_default("i2c_bus", "/dev/i2c-1")?
            .set_default("uart_device", "/dev/ttyAMA0")?
            .set_default("spi_device", "/dev/spidev0.1")?
            .set_default("spi_hz", 10_000_000i64)?
            .set_default("lcd_dc_pin", 9i64)?
            .set_default("lcd_reset_pin", 25i64)?
            .set_default("lcd_backlight_pin", 12i64)?
            .set_default("pms_reset_pin", 27i64)?
            .set_default("poll_interval_secs", 1i64)?
            .set_default("upload_interval_secs", DEFAULT_UPLOAD_INTERVAL_MS / 1000)?
            .set_default("compensation_factor", DEFAULT_COMPENSATION_FACTOR)?
            .set_default("endpoint", airlog_infra_net::DEFAULT_ENDPOINT)?
            .set_default(
                "software_version",
                format!("airlog {}", airlog_core::VERSION),
            )?
            .set_default("display_mode", "grid")?
            .set_default("graph_metric", "temperature")?
            .set_default("dry_run", false)?
            .set_default("log_format", "pretty")?
            .add_source(config::File::with_name(&file_path).required(false))
            .add_source(config::Environment::with_prefix("AIRLOG"));

        let mut settings: Settings = builder
            .build()
            .context("building configuration")?
            .try_deserialize()
            .context("deserializing configuration")?;

        // CLI flags win over file and environment
        if cli.dry_run {
            settings.dry_run = true;
        }
        if let Some(format) = &cli.log_format {
            settings.log_format = format.clone();
        }
        Ok(settings)
    }

    /// Resolve the configured view mode
    pub fn view(&self) -> Result<ViewMode> {
        match self.display_mode.as_str() {
            "grid" => Ok(ViewMode::Grid),
            "graph" => {
                let metric = self
                    .graph_metric
                    .parse()
                    .map_err(|e: String| anyhow::anyhow!(e))
                    .context("parsing graph_metric")?;
                Ok(ViewMode::Graph(metric))
            }
            other => anyhow::bail!("unknown display_mode: {}", other),
        }
    }

    /// Loop-level settings for the station
    pub fn station_settings(&self, station_id: String) -> Result<StationSettings> {
        Ok(StationSettings {
            station_id,
            poll_interval: std::time::Duration::from_secs(self.poll_interval_secs),
            upload_interval_ms: (self.upload_interval_secs as i64).saturating_mul(1000),
            view: self.view()?,
            dry_run: self.dry_run,
        })
    }
}

fn default_config_path() -> String {
    directories::ProjectDirs::from("", "", "airlog")
        .map(|dirs| {
            dirs.config_dir()
                .join("config.toml")
                .to_string_lossy()
                .into_owned()
        })
        .unwrap_or_else(|| "airlog.toml".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli() -> Cli {
        Cli {
            config: Some("/nonexistent/airlog-test-config".to_string()),
            dry_run: false,
            log_format: None,
        }
    }

    #[test]
    fn defaults_cover_the_enviro_wiring() {
        let settings = Settings::load(&cli()).unwrap();
        assert_eq!(settings.i2c_bus, "/dev/i2c-1");
        assert_eq!(settings.spi_device, "/dev/spidev0.1");
        assert_eq!(settings.lcd_dc_pin, 9);
        assert_eq!(settings.pms_reset_pin, Some(27));
        assert_eq!(settings.upload_interval_secs, 145);
        assert!((settings.compensation_factor - 1.2).abs() < 1e-9);
    }

    #[test]
    fn cli_dry_run_wins() {
        let mut cli = cli();
        cli.dry_run = true;
        let settings = Settings::load(&cli).unwrap();
        assert!(settings.dry_run);
    }

    #[test]
    fn grid_is_the_default_view() {
        let settings = Settings::load(&cli()).unwrap();
        assert!(matches!(settings.view().unwrap(), ViewMode::Grid));
    }

    #[test]
    fn graph_view_parses_its_metric() {
        let mut settings = Settings::load(&cli()).unwrap();
        settings.display_mode = "graph".to_string();
        settings.graph_metric = "pm25".to_string();
        match settings.view().unwrap() {
            ViewMode::Graph(metric) => {
                assert_eq!(metric, airlog_core::domain::Metric::Pm25)
            }
            _ => panic!("expected graph view"),
        }
    }

    #[test]
    fn unknown_display_mode_is_rejected() {
        let mut settings = Settings::load(&cli()).unwrap();
        settings.display_mode = "spiral".to_string();
        assert!(settings.view().is_err());
    }
}
