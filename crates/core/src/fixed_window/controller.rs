//! Fixed-window congestion controller implementation.

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::queue::QueueEstimator;
use crate::simulation::{RealTime, TimeSource};

/// Default window (datagrams).
pub const DEFAULT_FIXED_WINDOW: u32 = 50;

const DEFAULT_TIMEOUT_MS: u32 = 150;

/// Configuration for the fixed-window controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FixedWindowConfig {
    /// Datagrams permitted in flight.
    pub window: u32,
    /// Retransmission timeout (ms).
    pub timeout_ms: u32,
}

impl Default for FixedWindowConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_FIXED_WINDOW,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl FixedWindowConfig {
    /// Create a config with the specified window.
    pub fn new(window: u32) -> Self {
        Self {
            window,
            ..Default::default()
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window == 0 {
            return Err(ConfigError::invalid("window", "must be at least 1"));
        }
        Ok(())
    }
}

/// Fixed-window congestion controller.
///
/// Tracks the queue estimate for reporting only; the window never moves.
pub struct FixedWindowController<T: TimeSource = RealTime> {
    window: u32,
    timeout_ms: u32,
    queue: QueueEstimator,
    datagrams_sent: u64,
    acks_received: u64,

    /// Time source (for interface compatibility, not actually used).
    #[allow(dead_code)]
    time_source: T,
}

impl FixedWindowController<RealTime> {
    pub fn new(config: FixedWindowConfig) -> Result<Self, ConfigError> {
        Self::new_with_time_source(config, RealTime::new())
    }
}

impl<T: TimeSource> FixedWindowController<T> {
    /// Create a new fixed-window controller with custom time source.
    pub fn new_with_time_source(
        config: FixedWindowConfig,
        time_source: T,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            window: config.window,
            timeout_ms: config.timeout_ms,
            queue: QueueEstimator::new(),
            datagrams_sent: 0,
            acks_received: 0,
            time_source,
        })
    }

    pub fn on_datagram_sent(
        &mut self,
        sequence_number: u64,
        _send_timestamp_ms: u64,
        _is_retransmit: bool,
    ) {
        self.queue.on_send();
        self.datagrams_sent += 1;
        tracing::trace!(
            sequence_number,
            queue = self.queue.outstanding(),
            "Datagram sent"
        );
    }

    /// Feedback is ignored apart from the queue estimate.
    pub fn on_ack_received(
        &mut self,
        acked_sequence_number: u64,
        _send_timestamp_ms: u64,
        _receiver_timestamp_ms: u64,
        _ack_received_timestamp_ms: u64,
    ) {
        self.queue.on_ack();
        self.acks_received += 1;
        tracing::trace!(
            acked_sequence_number,
            queue = self.queue.outstanding(),
            "Ack received"
        );
    }

    pub fn query_window_size(&self) -> u32 {
        self.window
    }

    pub fn query_timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    pub fn queue_estimate(&self) -> u64 {
        self.queue.outstanding()
    }

    pub fn datagrams_sent(&self) -> u64 {
        self.datagrams_sent
    }

    pub fn acks_received(&self) -> u64 {
        self.acks_received
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::VirtualTime;

    #[test]
    fn test_default_config() {
        let config = FixedWindowConfig::default();
        assert_eq!(config.window, 50);
        assert_eq!(config.timeout_ms, 150);
    }

    #[test]
    fn test_zero_window_rejected() {
        assert!(FixedWindowController::new(FixedWindowConfig::new(0)).is_err());
    }

    #[test]
    fn test_window_ignores_feedback() {
        let mut controller = FixedWindowController::new_with_time_source(
            FixedWindowConfig::new(8),
            VirtualTime::new(),
        )
        .unwrap();

        for seq in 0..20 {
            controller.on_datagram_sent(seq, 0, false);
        }
        assert_eq!(controller.query_window_size(), 8);
        assert_eq!(controller.queue_estimate(), 20);

        for seq in 0..20 {
            controller.on_ack_received(seq, 0, 500, 1_000);
        }
        assert_eq!(controller.query_window_size(), 8);
        assert_eq!(controller.queue_estimate(), 0);
        assert_eq!(controller.acks_received(), 20);
    }

    #[test]
    fn test_queue_saturating() {
        let mut controller = FixedWindowController::new(FixedWindowConfig::default()).unwrap();
        controller.on_datagram_sent(1, 0, false);
        // ACK more than we sent - should saturate to 0, not underflow
        controller.on_ack_received(1, 0, 1, 2);
        controller.on_ack_received(1, 0, 1, 3);
        assert_eq!(controller.queue_estimate(), 0);
    }

    #[test]
    fn test_timeout_from_config() {
        let controller =
            FixedWindowController::new(FixedWindowConfig::default().with_timeout_ms(400)).unwrap();
        assert_eq!(controller.query_timeout_ms(), 400);
    }
}
