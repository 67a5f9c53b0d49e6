// Display frames: what one render cycle puts on the panel

use serde::{Deserialize, Serialize};

use super::{Metric, Snapshot, WarningLevel};

/// Which visualization the panel shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    /// 2-column grid of all metrics, color-coded by warning band
    Grid,
    /// Single metric with its rolling history trace
    Graph(Metric),
}

/// One line of the grid view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameLine {
    pub metric: Metric,
    pub value: f64,
    pub level: WarningLevel,
}

impl FrameLine {
    pub fn for_metric(snapshot: &Snapshot, metric: Metric) -> Self {
        let value = snapshot.value(metric);
        Self {
            metric,
            value,
            level: metric.classify(value),
        }
    }

    /// Panel/log text, e.g. `temp: 21.4 C`
    pub fn text(&self) -> String {
        format!("{}: {:.1} {}", self.metric.label(), self.value, self.metric.unit())
    }
}

/// A complete frame ready for the display adapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Frame {
    Grid {
        lines: Vec<FrameLine>,
    },
    Graph {
        line: FrameLine,
        /// History normalized to 0..=1, oldest first, one entry per pixel column
        trace: Vec<f64>,
    },
}

impl Frame {
    /// Build the frame for the current cycle
    pub fn build(snapshot: &Snapshot, mode: ViewMode, trace: impl FnOnce(Metric) -> Vec<f64>) -> Self {
        match mode {
            ViewMode::Grid => Frame::Grid {
                lines: Metric::ALL
                    .iter()
                    .map(|m| FrameLine::for_metric(snapshot, *m))
                    .collect(),
            },
            ViewMode::Graph(metric) => Frame::Graph {
                line: FrameLine::for_metric(snapshot, metric),
                trace: trace(metric),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::domain::{ClimateReading, GasReading, LightReading, ParticulateReading};

    fn snapshot() -> Snapshot {
        let now = Utc::now();
        Snapshot {
            climate: ClimateReading {
                timestamp: now,
                temperature_c: 21.37,
                pressure_hpa: 1009.5,
                humidity_percent: 48.2,
            },
            light: LightReading {
                timestamp: now,
                lux: 120.0,
                proximity: 0,
            },
            gas: GasReading {
                timestamp: now,
                oxidising_ohms: 12_300.0,
                reducing_ohms: 451_000.0,
                nh3_ohms: 98_000.0,
            },
            particulates: ParticulateReading {
                timestamp: now,
                pm1: 3,
                pm2_5: 7,
                pm10: 12,
            },
        }
    }

    #[test]
    fn grid_frame_covers_every_metric() {
        let frame = Frame::build(&snapshot(), ViewMode::Grid, |_| Vec::new());
        match frame {
            Frame::Grid { lines } => {
                assert_eq!(lines.len(), Metric::ALL.len());
                assert_eq!(lines[0].metric, Metric::Temperature);
            }
            _ => panic!("expected grid frame"),
        }
    }

    #[test]
    fn line_text_matches_panel_format() {
        let line = FrameLine::for_metric(&snapshot(), Metric::Temperature);
        assert_eq!(line.text(), "temp: 21.4 C");
        let line = FrameLine::for_metric(&snapshot(), Metric::Reducing);
        assert_eq!(line.text(), "redu: 451.0 kO");
    }

    #[test]
    fn graph_frame_carries_the_trace() {
        let frame = Frame::build(&snapshot(), ViewMode::Graph(Metric::Humidity), |m| {
            assert_eq!(m, Metric::Humidity);
            vec![0.0, 0.5, 1.0]
        });
        match frame {
            Frame::Graph { line, trace } => {
                assert_eq!(line.metric, Metric::Humidity);
                assert_eq!(trace, vec![0.0, 0.5, 1.0]);
            }
            _ => panic!("expected graph frame"),
        }
    }
}
