// CPU-heat temperature compensation.
//
// The climate sensor sits close enough to the SoC that its die temperature
// reads high. The reported value is pulled back by a fraction of the gap
// between the (smoothed) CPU temperature and the raw reading:
//
//   compensated = raw - (cpu_avg - raw) / factor

use std::collections::VecDeque;

/// Number of CPU temperature readings in the smoothing window
const CPU_TEMP_WINDOW: usize = 5;

/// Stateful compensator; feed it one CPU temperature per cycle
pub struct TemperatureCompensator {
    factor: f64,
    cpu_temps: VecDeque<f64>,
}

impl TemperatureCompensator {
    /// `factor` tunes the pull-back strength; smaller adjusts further down
    pub fn new(factor: f64) -> Self {
        Self {
            factor,
            cpu_temps: VecDeque::with_capacity(CPU_TEMP_WINDOW),
        }
    }

    /// Compensate a raw reading given this cycle's CPU temperature
    pub fn compensate(&mut self, raw_c: f64, cpu_temp_c: f64) -> f64 {
        if self.cpu_temps.len() == CPU_TEMP_WINDOW {
            self.cpu_temps.pop_front();
        }
        self.cpu_temps.push_back(cpu_temp_c);

        let cpu_avg = self.cpu_temps.iter().sum::<f64>() / self.cpu_temps.len() as f64;
        raw_c - (cpu_avg - raw_c) / self.factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pulls_reading_below_raw_when_cpu_is_hotter() {
        let mut comp = TemperatureCompensator::new(1.2);
        let value = comp.compensate(22.0, 46.0);
        // 22 - (46 - 22) / 1.2 = 2.0
        assert!((value - 2.0).abs() < 1e-9);
    }

    #[test]
    fn cpu_window_smooths_spikes() {
        let mut comp = TemperatureCompensator::new(1.2);
        for _ in 0..5 {
            comp.compensate(22.0, 40.0);
        }
        // One hot sample only moves the average by a fifth of the spike
        let spiked = comp.compensate(22.0, 50.0);
        let expected_avg = (40.0 * 4.0 + 50.0) / 5.0;
        let expected = 22.0 - (expected_avg - 22.0) / 1.2;
        assert!((spiked - expected).abs() < 1e-9);
    }

    #[test]
    fn window_stays_bounded() {
        let mut comp = TemperatureCompensator::new(1.2);
        for i in 0..100 {
            comp.compensate(20.0, 40.0 + f64::from(i));
        }
        assert_eq!(comp.cpu_temps.len(), CPU_TEMP_WINDOW);
    }
}
