// Station - the polling loop: sample, render, upload

pub mod constants;
mod shutdown;

use constants::*;
pub use shutdown::{Shutdown, ShutdownToken};

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::application::history::HistoryBank;
use crate::application::sampler::Sampler;
use crate::application::uplink::UploadSchedule;
use crate::domain::{Frame, FrameLine, Metric, ViewMode};
use crate::error::Result;
use crate::port::{StatusDisplay, TimeProvider, Uploader};

/// Loop-level settings resolved by the daemon's config layer
pub struct StationSettings {
    /// Identity sent upstream, e.g. `raspi-<serial>`
    pub station_id: String,
    pub poll_interval: Duration,
    pub upload_interval_ms: i64,
    pub view: ViewMode,
    /// Sample and render but never push upstream
    pub dry_run: bool,
}

impl Default for StationSettings {
    fn default() -> Self {
        Self {
            station_id: "raspi-unknown".to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            upload_interval_ms: DEFAULT_UPLOAD_INTERVAL_MS,
            view: ViewMode::Grid,
            dry_run: false,
        }
    }
}

/// The station: owns the sensors (via the sampler), the panel and the
/// uploader, and drives the fixed-period cycle
pub struct Station {
    settings: StationSettings,
    sampler: Sampler,
    display: Box<dyn StatusDisplay>,
    uploader: Arc<dyn Uploader>,
    schedule: UploadSchedule,
    history: HistoryBank,
}

impl Station {
    pub fn new(
        settings: StationSettings,
        sampler: Sampler,
        display: Box<dyn StatusDisplay>,
        uploader: Arc<dyn Uploader>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        let schedule = UploadSchedule::new(settings.upload_interval_ms, time_provider);
        Self {
            settings,
            sampler,
            display,
            uploader,
            schedule,
            history: HistoryBank::new(HISTORY_WIDTH),
        }
    }

    /// Run the polling loop until the shutdown token fires.
    ///
    /// A failed cycle is logged and the loop continues; nothing short of
    /// shutdown stops it.
    pub async fn run(&mut self, mut shutdown: ShutdownToken) -> Result<()> {
        info!(station_id = %self.settings.station_id, "Station started");
        loop {
            if shutdown.is_shutdown() {
                break;
            }
            let pause = match self.cycle().await {
                Ok(()) => self.settings.poll_interval,
                Err(e) => {
                    error!(error = %e, "Cycle failed, continuing");
                    ERROR_RECOVERY_SLEEP_DURATION
                }
            };
            tokio::select! {
                _ = sleep(pause) => {}
                _ = shutdown.wait() => {
                    info!("Station interrupted during sleep");
                    break;
                }
            }
        }
        info!(station_id = %self.settings.station_id, "Station stopped");
        Ok(())
    }

    /// One cycle: sample every sensor, record history, render, maybe upload
    async fn cycle(&mut self) -> Result<()> {
        let snapshot = self.sampler.sample().await?;
        self.history.record(&snapshot);

        for metric in Metric::ALL {
            debug!("{}", FrameLine::for_metric(&snapshot, metric).text());
        }

        let frame = Frame::build(&snapshot, self.settings.view, |m| self.history.trace(m));
        self.display.show(&frame)?;

        if self.schedule.is_due() {
            self.push_upstream(&snapshot).await;
            self.schedule.mark_attempted();
        }
        Ok(())
    }

    /// Push the current snapshot. Failures are logged, never propagated:
    /// the endpoint being down must not affect sampling or rendering.
    async fn push_upstream(&self, snapshot: &crate::domain::Snapshot) {
        if self.settings.dry_run {
            info!("Dry run: skipping upload");
            return;
        }
        let sample = snapshot.upload_sample();
        match self
            .uploader
            .push(&sample, &self.settings.station_id)
            .await
        {
            Ok(()) => info!(
                station_id = %self.settings.station_id,
                temperature_c = %format!("{:.2}", sample.temperature_c),
                pm2_5 = %sample.pm2_5,
                pm10 = %sample.pm10,
                "Upload ok"
            ),
            Err(e) => warn!(error = %e, "Upload failed"),
        }
    }
}
