//! Delay-AIMD congestion controller implementation.

use crate::errors::ConfigError;
use crate::queue::QueueEstimator;
use crate::simulation::{RealTime, TimeSource};

use super::config::DelayAimdConfig;

/// Delay-triggered AIMD controller.
///
/// All adaptation happens on acknowledgments; queries only read state.
pub struct DelayAimdController<T: TimeSource = RealTime> {
    config: DelayAimdConfig,
    window: u32,
    /// Ack credit accumulated towards the next increase.
    window_acks: u64,
    last_acked_sequence: u64,
    queue: QueueEstimator,

    // === Statistics ===
    increases: u64,
    decreases: u64,
    peak_window: u32,
    last_rtt_ms: Option<u64>,

    #[allow(dead_code)]
    time_source: T,
}

impl DelayAimdController<RealTime> {
    pub fn new(config: DelayAimdConfig) -> Result<Self, ConfigError> {
        Self::new_with_time_source(config, RealTime::new())
    }
}

impl<T: TimeSource> DelayAimdController<T> {
    pub fn new_with_time_source(
        config: DelayAimdConfig,
        time_source: T,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            window: config.initial_window,
            window_acks: 0,
            last_acked_sequence: 0,
            queue: QueueEstimator::new(),
            increases: 0,
            decreases: 0,
            peak_window: config.initial_window,
            last_rtt_ms: None,
            config,
            time_source,
        })
    }

    pub fn on_datagram_sent(
        &mut self,
        sequence_number: u64,
        send_timestamp_ms: u64,
        is_retransmit: bool,
    ) {
        self.queue.on_send();
        tracing::trace!(
            sequence_number,
            send_timestamp_ms,
            is_retransmit,
            queue = self.queue.outstanding(),
            "Datagram sent"
        );
    }

    pub fn on_ack_received(
        &mut self,
        acked_sequence_number: u64,
        send_timestamp_ms: u64,
        receiver_timestamp_ms: u64,
        ack_received_timestamp_ms: u64,
    ) {
        self.queue.on_ack();

        // Reordered acks earn no credit
        self.window_acks = self
            .window_acks
            .saturating_add(acked_sequence_number.saturating_sub(self.last_acked_sequence));
        self.last_acked_sequence = acked_sequence_number;

        if self.window_acks >= u64::from(self.window) {
            self.window = self.window.saturating_add(1);
            self.window_acks = 0;
            self.increases += 1;
            self.peak_window = self.peak_window.max(self.window);
        }

        let rtt_ms = ack_received_timestamp_ms.saturating_sub(send_timestamp_ms);
        self.last_rtt_ms = Some(rtt_ms);

        if rtt_ms <= self.config.fast_ack_threshold_ms() {
            self.window_acks = self.window_acks.saturating_add(self.config.fast_ack_bonus);
        }

        if rtt_ms >= self.config.max_delay_ms {
            let old_window = self.window;
            self.window_acks = 0;
            self.window = ((f64::from(self.window) * self.config.beta) as u32)
                .max(self.config.min_window);
            self.decreases += 1;
            tracing::debug!(
                acked_sequence_number,
                rtt_ms,
                old_window,
                new_window = self.window,
                "Round trip over delay ceiling, window decreased"
            );
        }

        tracing::trace!(
            acked_sequence_number,
            send_timestamp_ms,
            receiver_timestamp_ms,
            ack_received_timestamp_ms,
            window = self.window,
            window_acks = self.window_acks,
            queue = self.queue.outstanding(),
            "Ack received"
        );
    }

    pub fn query_window_size(&self) -> u32 {
        self.window
    }

    pub fn query_timeout_ms(&self) -> u32 {
        self.config.timeout_ms
    }

    pub fn queue_estimate(&self) -> u64 {
        self.queue.outstanding()
    }

    pub fn window_acks(&self) -> u64 {
        self.window_acks
    }

    pub fn peak_window(&self) -> u32 {
        self.peak_window
    }

    pub fn increases(&self) -> u64 {
        self.increases
    }

    pub fn decreases(&self) -> u64 {
        self.decreases
    }

    pub fn last_rtt_ms(&self) -> Option<u64> {
        self.last_rtt_ms
    }

    pub fn config(&self) -> &DelayAimdConfig {
        &self.config
    }
}
