//! Airlog station daemon - Main Entry Point
//!
//! Composition root: config, logging, hardware wiring, the station loop
//! and graceful shutdown.

mod config;
mod telemetry;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use airlog_core::application::station::Shutdown;
use airlog_core::application::{Sampler, Station};
use airlog_core::port::time_provider::SystemTimeProvider;
use airlog_core::port::HostProbe;
use airlog_infra_hw::{
    Bme280Climate, Ltr559Light, Mics6814Gas, PanelPins, Pms5003Particulates, St7735Panel,
};
use airlog_infra_net::LuftdatenClient;
use airlog_infra_system::HostProbeImpl;

use crate::config::{Cli, Settings};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Grace period for the station loop to wind down after the signal
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(&cli)?;

    // 1. Initialize logging; keep the appender guard alive for the
    //    whole process
    let _log_guard = init_logging(&settings)?;

    info!("Airlog station v{} starting...", VERSION);

    // 1.1. Optional OpenTelemetry
    if let Err(e) = telemetry::init_telemetry() {
        tracing::warn!(error = ?e, "Failed to initialize OpenTelemetry (continuing without it)");
    }

    // 2. Resolve station identity and report connectivity
    let host_probe: Arc<dyn HostProbe> = Arc::new(HostProbeImpl::new());
    let serial = host_probe
        .serial_number()
        .await
        .context("reading board serial number")?;
    let station_id = format!("raspi-{}", serial);
    let network = host_probe.has_network().await;
    info!(
        station_id = %station_id,
        network = if network { "connected" } else { "disconnected" },
        "Station identity resolved"
    );

    // 3. Open the hardware
    let climate = Bme280Climate::open(&settings.i2c_bus).context("opening BME280")?;
    let light = Ltr559Light::open(&settings.i2c_bus).context("opening LTR-559")?;
    let gas = Mics6814Gas::open(&settings.i2c_bus).context("opening gas ADC")?;
    let particulates = Pms5003Particulates::open(&settings.uart_device, settings.pms_reset_pin)
        .context("opening PMS5003")?;
    let display = St7735Panel::open(
        &settings.spi_device,
        settings.spi_hz,
        PanelPins {
            dc: settings.lcd_dc_pin,
            reset: settings.lcd_reset_pin,
            backlight: settings.lcd_backlight_pin,
        },
    )
    .context("opening status panel")?;

    // 4. Wire the application
    let uploader = Arc::new(
        LuftdatenClient::new(settings.endpoint.clone(), settings.software_version.clone())
            .context("building upload client")?,
    );
    let sampler = Sampler::new(
        Box::new(climate),
        Box::new(light),
        Box::new(gas),
        Box::new(particulates),
        host_probe.clone(),
        settings.compensation_factor,
    );
    let mut station = Station::new(
        settings.station_settings(station_id)?,
        sampler,
        Box::new(display),
        uploader,
        Arc::new(SystemTimeProvider),
    );

    // 5. Run the loop until a signal arrives
    let shutdown = Shutdown::new();
    let token = shutdown.token();
    let station_handle = tokio::spawn(async move {
        if let Err(e) = station.run(token).await {
            error!(error = ?e, "Station loop failed");
        }
    });

    info!("Station running. Press Ctrl+C to shutdown");
    wait_for_signal().await?;

    info!("Shutdown signal received. Exiting gracefully...");
    shutdown.trigger();
    let _ = tokio::time::timeout(SHUTDOWN_TIMEOUT, station_handle).await;

    info!("Shutdown complete.");
    Ok(())
}

/// Set up tracing: pretty or json on stdout, plus an optional daily
/// json log file
fn init_logging(
    settings: &Settings,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .context("creating env filter")?;

    let (file_layer, guard) = match settings.log_dir.as_deref() {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "airlog.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().json().with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    match settings.log_format.as_str() {
        "json" => tracing_subscriber::registry()
            .with(env_filter)
            .with(file_layer)
            .with(fmt::layer().json())
            .init(),
        _ => tracing_subscriber::registry()
            .with(env_filter)
            .with(file_layer)
            .with(fmt::layer().pretty())
            .init(),
    }
    Ok(guard)
}

/// Resolve on SIGINT or SIGTERM
async fn wait_for_signal() -> Result<()> {
    let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        .context("installing SIGTERM handler")?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result.context("waiting for Ctrl+C")?,
        _ = sigterm.recv() => {}
    }
    Ok(())
}
