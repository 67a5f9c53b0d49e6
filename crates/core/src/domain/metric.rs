// Metric catalog: the ten quantities the station tracks

use serde::{Deserialize, Serialize};

/// A quantity sampled by the station
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Temperature,
    Pressure,
    Humidity,
    Light,
    Oxidising,
    Reducing,
    Nh3,
    Pm1,
    Pm25,
    Pm10,
}

/// Warning band for a metric value, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WarningLevel {
    DangerouslyLow,
    Low,
    Normal,
    High,
    DangerouslyHigh,
}

impl WarningLevel {
    /// Screen palette: blue, cyan, green, yellow, red
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            WarningLevel::DangerouslyLow => (0, 0, 255),
            WarningLevel::Low => (0, 255, 255),
            WarningLevel::Normal => (0, 255, 0),
            WarningLevel::High => (255, 255, 0),
            WarningLevel::DangerouslyHigh => (255, 0, 0),
        }
    }
}

impl Metric {
    /// All metrics in display order (left column top-to-bottom, then right)
    pub const ALL: [Metric; 10] = [
        Metric::Temperature,
        Metric::Pressure,
        Metric::Humidity,
        Metric::Light,
        Metric::Oxidising,
        Metric::Reducing,
        Metric::Nh3,
        Metric::Pm1,
        Metric::Pm25,
        Metric::Pm10,
    ];

    /// Unit suffix shown on screen and in logs
    pub fn unit(&self) -> &'static str {
        match self {
            Metric::Temperature => "C",
            Metric::Pressure => "hPa",
            Metric::Humidity => "%",
            Metric::Light => "Lux",
            Metric::Oxidising | Metric::Reducing | Metric::Nh3 => "kO",
            Metric::Pm1 | Metric::Pm25 | Metric::Pm10 => "ug/m3",
        }
    }

    /// Short label that fits the 160px panel (max 4 chars)
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Temperature => "temp",
            Metric::Pressure => "pres",
            Metric::Humidity => "humi",
            Metric::Light => "ligh",
            Metric::Oxidising => "oxid",
            Metric::Reducing => "redu",
            Metric::Nh3 => "nh3",
            Metric::Pm1 => "pm1",
            Metric::Pm25 => "pm25",
            Metric::Pm10 => "pm10",
        }
    }

    /// Band boundaries: (low_danger, low, high, high_danger).
    ///
    /// A value at or below the first bound is DangerouslyLow, above the last
    /// is DangerouslyHigh. Metrics with no meaningful lower bands use -1 so
    /// every real value starts at Normal.
    pub fn thresholds(&self) -> [f64; 4] {
        match self {
            Metric::Temperature => [4.0, 18.0, 28.0, 35.0],
            Metric::Pressure => [250.0, 650.0, 1013.25, 1015.0],
            Metric::Humidity => [20.0, 30.0, 60.0, 70.0],
            Metric::Light => [-1.0, -1.0, 30_000.0, 100_000.0],
            Metric::Oxidising => [-1.0, -1.0, 40.0, 50.0],
            Metric::Reducing => [-1.0, -1.0, 450.0, 550.0],
            Metric::Nh3 => [-1.0, -1.0, 200.0, 300.0],
            Metric::Pm1 | Metric::Pm25 | Metric::Pm10 => [-1.0, -1.0, 50.0, 100.0],
        }
    }

    /// Classify a value into its warning band
    pub fn classify(&self, value: f64) -> WarningLevel {
        let bands = [
            WarningLevel::Low,
            WarningLevel::Normal,
            WarningLevel::High,
            WarningLevel::DangerouslyHigh,
        ];
        let mut level = WarningLevel::DangerouslyLow;
        for (bound, band) in self.thresholds().iter().zip(bands) {
            if value > *bound {
                level = band;
            }
        }
        level
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Metric::Temperature => "temperature",
            Metric::Pressure => "pressure",
            Metric::Humidity => "humidity",
            Metric::Light => "light",
            Metric::Oxidising => "oxidising",
            Metric::Reducing => "reducing",
            Metric::Nh3 => "nh3",
            Metric::Pm1 => "pm1",
            Metric::Pm25 => "pm25",
            Metric::Pm10 => "pm10",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "temperature" => Ok(Metric::Temperature),
            "pressure" => Ok(Metric::Pressure),
            "humidity" => Ok(Metric::Humidity),
            "light" => Ok(Metric::Light),
            "oxidising" => Ok(Metric::Oxidising),
            "reducing" => Ok(Metric::Reducing),
            "nh3" => Ok(Metric::Nh3),
            "pm1" => Ok(Metric::Pm1),
            "pm25" => Ok(Metric::Pm25),
            "pm10" => Ok(Metric::Pm10),
            other => Err(format!("unknown metric: {}", other)),
        }
    }
}
