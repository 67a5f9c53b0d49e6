//! Particulate sensor behavior seen from the whole pipeline: a timeout
//! triggers one reset-and-retry, and the recovered values flow through to
//! the rendered frame

use std::sync::Arc;
use std::time::Duration;

use airlog_core::application::station::Shutdown;
use airlog_core::application::{Sampler, Station, StationSettings};
use airlog_core::domain::{Frame, Metric, ViewMode};
use airlog_core::port::display::mocks::MockStatusDisplay;
use airlog_core::port::host_probe::mocks::MockHostProbe;
use airlog_core::port::sensor::mocks::{
    MockClimateSensor, MockGasSensor, MockLightSensor, MockParticulateSensor,
};
use airlog_core::port::time_provider::mocks::MockTimeProvider;
use airlog_core::port::uploader::mocks::MockUploader;

#[tokio::test]
async fn timeout_recovery_feeds_the_retried_values_to_the_panel() {
    let particulates = MockParticulateSensor::new();
    particulates.push_timeout();
    particulates.push_reading(4, 8, 15);
    let resets = particulates.reset_count();

    let display = MockStatusDisplay::new();
    let frames = display.frames();

    let sampler = Sampler::new(
        Box::new(MockClimateSensor::new(22.0, 1010.0, 45.0)),
        Box::new(MockLightSensor::new(150.0)),
        Box::new(MockGasSensor::new(11_000.0, 420_000.0, 95_000.0)),
        Box::new(particulates),
        Arc::new(MockHostProbe::new(46.0)),
        1.2,
    );
    let mut station = Station::new(
        StationSettings {
            station_id: "raspi-test".to_string(),
            poll_interval: Duration::from_millis(5),
            upload_interval_ms: i64::MAX,
            view: ViewMode::Grid,
            dry_run: false,
        },
        sampler,
        Box::new(display),
        Arc::new(MockUploader::new()),
        Arc::new(MockTimeProvider::new(0)),
    );

    let shutdown = Shutdown::new();
    let token = shutdown.token();
    let handle = tokio::spawn(async move { station.run(token).await });

    tokio::time::sleep(Duration::from_millis(50)).await;
    shutdown.trigger();
    handle.await.unwrap().unwrap();

    assert_eq!(
        *resets.lock().unwrap(),
        1,
        "one timeout means exactly one reset"
    );

    let frames = frames.lock().unwrap();
    assert!(!frames.is_empty(), "first cycle must still render");
    match &frames[0] {
        Frame::Grid { lines } => {
            let pm25 = lines
                .iter()
                .find(|l| l.metric == Metric::Pm25)
                .expect("grid frame carries pm25");
            assert!((pm25.value - 8.0).abs() < 1e-9, "retried value rendered");
        }
        _ => panic!("expected grid frame"),
    }
}

#[tokio::test]
async fn double_timeout_fails_the_cycle_but_not_the_loop() {
    let particulates = MockParticulateSensor::new();
    // First cycle: two timeouts in a row -> cycle error
    particulates.push_timeout();
    particulates.push_timeout();
    // Later cycles succeed via the default reading
    let resets = particulates.reset_count();

    let display = MockStatusDisplay::new();
    let frames = display.frames();

    let sampler = Sampler::new(
        Box::new(MockClimateSensor::new(22.0, 1010.0, 45.0)),
        Box::new(MockLightSensor::new(150.0)),
        Box::new(MockGasSensor::new(11_000.0, 420_000.0, 95_000.0)),
        Box::new(particulates),
        Arc::new(MockHostProbe::new(46.0)),
        1.2,
    );
    let mut station = Station::new(
        StationSettings {
            station_id: "raspi-test".to_string(),
            poll_interval: Duration::from_millis(5),
            upload_interval_ms: i64::MAX,
            view: ViewMode::Grid,
            dry_run: false,
        },
        sampler,
        Box::new(display),
        Arc::new(MockUploader::new()),
        Arc::new(MockTimeProvider::new(0)),
    );

    let shutdown = Shutdown::new();
    let token = shutdown.token();
    let handle = tokio::spawn(async move { station.run(token).await });

    // Survive the failed cycle's 1s recovery sleep, then render normally
    tokio::time::sleep(Duration::from_millis(1300)).await;
    shutdown.trigger();
    handle.await.unwrap().unwrap();

    assert_eq!(*resets.lock().unwrap(), 1, "retry resets only once per read");
    assert!(
        !frames.lock().unwrap().is_empty(),
        "loop recovered and rendered after the failed cycle"
    );
}
