//! Window sizing and timeout policies.

use super::config::SproutConfig;

/// Turns a forecast into the next window size.
///
/// ```text
/// next = max(round(gain * forecast - queue + previous), floor)
/// ```
///
/// Arithmetic happens in `f64` so a queue larger than the window cannot wrap.
#[derive(Debug, Clone, Copy)]
pub struct WindowPolicy {
    gain: f64,
    floor: u32,
}

impl WindowPolicy {
    pub fn new(gain: f64, floor: u32) -> Self {
        Self { gain, floor }
    }

    pub fn from_config(config: &SproutConfig) -> Self {
        Self::new(config.gain, config.min_window)
    }

    pub fn floor(&self) -> u32 {
        self.floor
    }

    /// Next window given the forecast (datagrams over the horizon), the queue
    /// estimate and the previous window.
    pub fn next_window(&self, forecast_packets: f64, queue: u64, previous: u32) -> u32 {
        let candidate = self.gain * forecast_packets - queue as f64 + f64::from(previous);
        if !candidate.is_finite() {
            return previous.max(self.floor);
        }
        let rounded = candidate.round().min(f64::from(u32::MAX));
        if rounded <= f64::from(self.floor) {
            self.floor
        } else {
            rounded as u32
        }
    }
}

/// Fixed retransmission timeout.
#[derive(Debug, Clone, Copy)]
pub struct TimeoutPolicy {
    timeout_ms: u32,
}

impl TimeoutPolicy {
    pub fn new(timeout_ms: u32) -> Self {
        Self { timeout_ms }
    }

    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formula() {
        let policy = WindowPolicy::new(1.2, 5);
        // 1.2 * 20 - 10 + 30 = 44
        assert_eq!(policy.next_window(20.0, 10, 30), 44);
        // 1.2 * 8.8 - 13 + 13 = 10.56 -> 11
        assert_eq!(policy.next_window(8.8, 13, 13), 11);
    }

    #[test]
    fn test_floor_applies() {
        let policy = WindowPolicy::new(1.2, 5);
        assert_eq!(policy.next_window(0.0, 50, 50), 5);
        assert_eq!(policy.next_window(0.0, 1_000_000, 6), 5);
    }

    #[test]
    fn test_saturates_on_huge_forecast() {
        let policy = WindowPolicy::new(1.2, 5);
        assert_eq!(policy.next_window(1e300, 0, 50), u32::MAX);
        assert_eq!(policy.next_window(f64::NAN, 0, 50), 50);
    }

    #[test]
    fn test_from_config() {
        let policy = WindowPolicy::from_config(&SproutConfig::default().with_min_window(8));
        assert_eq!(policy.floor(), 8);
        assert_eq!(policy.next_window(0.0, 100, 10), 8);
    }

    #[test]
    fn test_timeout_is_fixed() {
        assert_eq!(TimeoutPolicy::new(150).timeout_ms(), 150);
    }
}
