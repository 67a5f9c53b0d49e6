// Rolling per-metric history backing the graph view

use std::collections::{HashMap, VecDeque};

use crate::domain::{Metric, Snapshot};

/// Fixed-capacity rolling window of values for one metric
pub struct MetricHistory {
    values: VecDeque<f64>,
    capacity: usize,
}

impl MetricHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            values: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, value: f64) {
        if self.values.len() == self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Window scaled to 0..=1, oldest first. The +1 in both terms keeps a
    /// flat window at a defined midpoint instead of dividing by zero.
    pub fn normalized(&self) -> Vec<f64> {
        let min = self.values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self
            .values
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        self.values
            .iter()
            .map(|v| (v - min + 1.0) / (max - min + 1.0))
            .collect()
    }
}

/// One history window per metric, all sized to the panel width
pub struct HistoryBank {
    windows: HashMap<Metric, MetricHistory>,
    width: usize,
}

impl HistoryBank {
    pub fn new(width: usize) -> Self {
        let mut windows = HashMap::new();
        for metric in Metric::ALL {
            windows.insert(metric, MetricHistory::new(width));
        }
        Self { windows, width }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Record every metric of a snapshot
    pub fn record(&mut self, snapshot: &Snapshot) {
        for metric in Metric::ALL {
            if let Some(window) = self.windows.get_mut(&metric) {
                window.push(snapshot.value(metric));
            }
        }
    }

    pub fn trace(&self, metric: Metric) -> Vec<f64> {
        self.windows
            .get(&metric)
            .map(|w| w.normalized())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_drops_oldest_at_capacity() {
        let mut history = MetricHistory::new(3);
        for v in [1.0, 2.0, 3.0, 4.0] {
            history.push(v);
        }
        assert_eq!(history.len(), 3);
        let normalized = history.normalized();
        // 2.0 is now the minimum
        assert!((normalized[0] - 1.0 / 3.0).abs() < 1e-9);
        assert!((normalized[2] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn flat_window_normalizes_without_dividing_by_zero() {
        let mut history = MetricHistory::new(4);
        for _ in 0..4 {
            history.push(7.5);
        }
        for v in history.normalized() {
            assert!((v - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn bank_tracks_every_metric() {
        let mut bank = HistoryBank::new(160);
        bank.record(&crate::domain::Snapshot {
            climate: crate::domain::ClimateReading {
                timestamp: chrono::Utc::now(),
                temperature_c: 20.0,
                pressure_hpa: 1000.0,
                humidity_percent: 50.0,
            },
            light: crate::domain::LightReading {
                timestamp: chrono::Utc::now(),
                lux: 80.0,
                proximity: 0,
            },
            gas: crate::domain::GasReading {
                timestamp: chrono::Utc::now(),
                oxidising_ohms: 10_000.0,
                reducing_ohms: 400_000.0,
                nh3_ohms: 90_000.0,
            },
            particulates: crate::domain::ParticulateReading {
                timestamp: chrono::Utc::now(),
                pm1: 1,
                pm2_5: 2,
                pm10: 3,
            },
        });
        for metric in Metric::ALL {
            assert_eq!(bank.trace(metric).len(), 1);
        }
    }
}
