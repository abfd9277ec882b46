//! Sprout statistics for telemetry and debugging.
//!
//! This module provides a snapshot of the Sprout controller state for
//! logging and debugging purposes.

use super::forecast::Forecast;

/// Snapshot of Sprout controller state.
#[derive(Debug, Clone, Default)]
pub struct SproutStats {
    /// Current window (datagrams).
    pub window: u32,

    /// Datagrams sent but not yet acknowledged.
    pub queue_estimate: u64,

    /// Acknowledgments waiting in the arrival log.
    pub pending_arrivals: usize,

    /// Ticks processed since construction.
    pub ticks_processed: u64,

    /// Most recent forecast, if any tick has produced one.
    pub last_forecast: Option<Forecast>,

    /// Expected rate under the current belief (datagrams/sec).
    pub belief_mean_pps: f64,

    /// Most probable rate under the current belief (datagrams/sec).
    pub belief_mode_pps: f64,

    /// Forecasts that found no qualifying rate.
    pub forecast_fallbacks: u64,

    /// Renormalisations that reset the belief to uniform.
    pub belief_resets: u64,

    /// Datagrams reported sent, including retransmissions.
    pub datagrams_sent: u64,

    /// Of which retransmissions.
    pub retransmits: u64,

    /// Acknowledgments received.
    pub acks_received: u64,

    /// Acknowledgments that arrived with nothing outstanding.
    pub spurious_acks: u64,

    /// Retransmission timeout (ms).
    pub timeout_ms: u32,
}

impl std::fmt::Display for SproutStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Sprout[tick {}] win={} queue={} pending={} mean={:.1}pps mode={:.1}pps",
            self.ticks_processed,
            self.window,
            self.queue_estimate,
            self.pending_arrivals,
            self.belief_mean_pps,
            self.belief_mode_pps,
        )?;
        match &self.last_forecast {
            Some(forecast) => write!(
                f,
                " forecast={:.1}pps ({:.1} pkts)",
                forecast.rate_pps, forecast.packets
            ),
            None => write!(f, " forecast=none"),
        }
    }
}
