//! Sprout congestion controller implementation.
//!
//! The controller owns every piece of per-session state: the belief over link
//! rates, the arrival log, the queue estimate and the tick cursor. It never
//! runs on its own; all belief updates happen inside
//! [`SproutController::query_window_size`], which replays the ticks that have
//! elapsed since the previous query.

use crate::errors::ConfigError;
use crate::queue::QueueEstimator;
use crate::simulation::{RealTime, TimeSource};

use super::arrivals::ArrivalAccumulator;
use super::belief::{BeliefDistribution, Normalization};
use super::config::{ForecastFallback, SproutConfig};
use super::diffusion::DiffusionStep;
use super::forecast::{Forecast, Forecaster};
use super::likelihood::BayesUpdateStep;
use super::scheduler::TickScheduler;
use super::stats::SproutStats;
use super::support::RateSupport;
use super::window::{TimeoutPolicy, WindowPolicy};

/// Sprout congestion controller.
///
/// ## Usage
///
/// ```ignore
/// let mut controller = SproutController::new(SproutConfig::default())?;
/// let now = controller.now_ms();
///
/// controller.on_datagram_sent(seq, now, false);
/// controller.on_ack_received(seq, sent_at, receiver_ts, now);
///
/// let window = controller.query_window_size();
/// let timeout = controller.query_timeout_ms();
/// ```
///
/// Event methods take `&mut self`; a transport that shares the controller
/// between threads must wrap it in its own lock.
pub struct SproutController<T: TimeSource = RealTime> {
    config: SproutConfig,

    // === Inference ===
    support: RateSupport,
    belief: BeliefDistribution,
    diffusion: DiffusionStep,
    bayes: BayesUpdateStep,
    forecaster: Forecaster,

    // === Feedback ===
    arrivals: ArrivalAccumulator,
    queue: QueueEstimator,
    scheduler: TickScheduler,

    // === Output ===
    window_policy: WindowPolicy,
    timeout: TimeoutPolicy,
    window: u32,
    last_forecast: Option<Forecast>,

    // === Statistics ===
    ticks_processed: u64,
    forecast_fallbacks: u64,
    belief_resets: u64,
    datagrams_sent: u64,
    retransmits: u64,
    acks_received: u64,
    spurious_acks: u64,

    time_source: T,
}

impl SproutController<RealTime> {
    /// Create a new Sprout controller reading the wall clock.
    pub fn new(config: SproutConfig) -> Result<Self, ConfigError> {
        Self::new_with_time_source(config, RealTime::new())
    }
}

impl<T: TimeSource> SproutController<T> {
    /// Create a new Sprout controller with a custom time source.
    pub fn new_with_time_source(
        config: SproutConfig,
        time_source: T,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let support = RateSupport::new(config.support_buckets, config.max_rate_pps);
        let belief = BeliefDistribution::uniform(support.len());
        let diffusion = DiffusionStep::from_config(&config, &support);
        let scheduler = TickScheduler::new(
            time_source.now_millis(),
            config.tick_duration_ms,
            config.feedback_delay_ms,
        );

        Ok(Self {
            bayes: BayesUpdateStep::from_config(&config),
            forecaster: Forecaster::from_config(&config),
            window_policy: WindowPolicy::from_config(&config),
            timeout: TimeoutPolicy::new(config.timeout_ms),
            window: config.initial_window,
            support,
            belief,
            diffusion,
            arrivals: ArrivalAccumulator::new(),
            queue: QueueEstimator::new(),
            scheduler,
            last_forecast: None,
            ticks_processed: 0,
            forecast_fallbacks: 0,
            belief_resets: 0,
            datagrams_sent: 0,
            retransmits: 0,
            acks_received: 0,
            spurious_acks: 0,
            config,
            time_source,
        })
    }

    // =========================================================================
    // Event Handlers
    // =========================================================================

    /// Records an outstanding datagram.
    pub fn on_datagram_sent(
        &mut self,
        sequence_number: u64,
        send_timestamp_ms: u64,
        is_retransmit: bool,
    ) {
        self.queue.on_send();
        self.datagrams_sent += 1;
        if is_retransmit {
            self.retransmits += 1;
        }

        if self.config.debug {
            tracing::debug!(
                sequence_number,
                send_timestamp_ms,
                is_retransmit,
                queue = self.queue.outstanding(),
                "Datagram sent"
            );
        } else {
            tracing::trace!(
                sequence_number,
                send_timestamp_ms,
                is_retransmit,
                queue = self.queue.outstanding(),
                "Datagram sent"
            );
        }
    }

    /// Records an acknowledgment.
    ///
    /// Only the receiver timestamp feeds the rate estimate; the other
    /// timestamps are kept for logging.
    pub fn on_ack_received(
        &mut self,
        acked_sequence_number: u64,
        send_timestamp_ms: u64,
        receiver_timestamp_ms: u64,
        ack_received_timestamp_ms: u64,
    ) {
        self.arrivals.record(receiver_timestamp_ms);
        self.acks_received += 1;
        if !self.queue.on_ack() {
            self.spurious_acks += 1;
            tracing::debug!(
                acked_sequence_number,
                "Ack with no datagram outstanding, queue estimate stays at zero"
            );
        }

        if self.config.debug {
            tracing::debug!(
                acked_sequence_number,
                send_timestamp_ms,
                receiver_timestamp_ms,
                ack_received_timestamp_ms,
                queue = self.queue.outstanding(),
                "Ack received"
            );
        } else {
            tracing::trace!(
                acked_sequence_number,
                send_timestamp_ms,
                receiver_timestamp_ms,
                ack_received_timestamp_ms,
                queue = self.queue.outstanding(),
                "Ack received"
            );
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Current permitted number of datagrams in flight.
    ///
    /// Replays every tick that has elapsed since the last query before
    /// answering.
    pub fn query_window_size(&mut self) -> u32 {
        self.catch_up();
        self.window
    }

    /// Retransmission timeout in milliseconds.
    pub fn query_timeout_ms(&self) -> u32 {
        self.timeout.timeout_ms()
    }

    /// Processes all ticks due at the current time. Returns how many ran.
    pub fn catch_up(&mut self) -> u64 {
        let now_ms = self.time_source.now_millis();
        let mut processed = 0;

        while let Some(tick) = self.scheduler.next_due(now_ms) {
            let diffused = self.diffusion.apply(&mut self.belief);
            self.note_normalization(diffused, "diffusion");

            let observed = self.arrivals.take_confirmed(tick.arrival_threshold_ms);
            let updated = self.bayes.apply(&mut self.belief, &self.support, observed);
            self.note_normalization(updated, "bayes update");

            processed += 1;
            self.ticks_processed += 1;

            tracing::trace!(
                tick = self.ticks_processed,
                cursor_ms = self.scheduler.cursor_ms(),
                observed,
                "Tick processed"
            );

            if tick.is_latest {
                self.update_window(processed);
            }
        }

        processed
    }

    fn update_window(&mut self, caught_up: u64) {
        let forecast = self
            .forecaster
            .forecast(&self.belief, &self.support, &self.diffusion);
        self.apply_forecast(forecast, caught_up);
    }

    fn apply_forecast(&mut self, forecast: Option<Forecast>, caught_up: u64) {
        let old_window = self.window;
        let queue = self.queue.outstanding();

        match forecast {
            Some(forecast) => {
                self.window = self
                    .window_policy
                    .next_window(forecast.packets, queue, old_window);
                self.last_forecast = Some(forecast);

                tracing::debug!(
                    caught_up,
                    forecast_pps = forecast.rate_pps,
                    forecast_packets = forecast.packets,
                    queue,
                    old_window,
                    new_window = self.window,
                    "Window updated"
                );
            }
            None => {
                self.forecast_fallbacks += 1;
                self.window = match self.config.forecast_fallback {
                    ForecastFallback::PreserveWindow => old_window,
                    ForecastFallback::Floor => self.window_policy.floor(),
                };
                tracing::warn!(
                    quantile = self.forecaster.quantile(),
                    fallback = ?self.config.forecast_fallback,
                    old_window,
                    new_window = self.window,
                    "Forecast found no rate above the quantile, applying fallback"
                );
            }
        }
    }

    fn note_normalization(&mut self, outcome: Normalization, stage: &'static str) {
        if outcome == Normalization::ResetUniform {
            self.belief_resets += 1;
            tracing::warn!(stage, "Belief lost all mass, reset to uniform");
        }
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    /// Forecast from the current belief at the configured quantile.
    ///
    /// Does not advance ticks or change the window.
    pub fn forecast(&self) -> Option<Forecast> {
        self.forecaster
            .forecast(&self.belief, &self.support, &self.diffusion)
    }

    /// Forecast from the current belief at an explicit quantile.
    pub fn forecast_with_quantile(&self, quantile: f64) -> Option<Forecast> {
        self.forecaster
            .forecast_with_quantile(&self.belief, &self.support, &self.diffusion, quantile)
    }

    /// Window as of the last processed tick, without catching up.
    pub fn current_window(&self) -> u32 {
        self.window
    }

    pub fn queue_estimate(&self) -> u64 {
        self.queue.outstanding()
    }

    pub fn pending_arrivals(&self) -> usize {
        self.arrivals.pending()
    }

    pub fn ticks_processed(&self) -> u64 {
        self.ticks_processed
    }

    pub fn last_forecast(&self) -> Option<Forecast> {
        self.last_forecast
    }

    /// Belief mass on the candidate rate nearest `rate_pps`.
    pub fn mass_at_rate(&self, rate_pps: f64) -> f64 {
        self.belief.mass(self.support.nearest_index(rate_pps))
    }

    pub fn belief(&self) -> &BeliefDistribution {
        &self.belief
    }

    pub fn support(&self) -> &RateSupport {
        &self.support
    }

    pub fn config(&self) -> &SproutConfig {
        &self.config
    }

    /// Current time on the controller's clock, for stamping events.
    pub fn now_ms(&self) -> u64 {
        self.time_source.now_millis()
    }

    pub fn time_source(&self) -> &T {
        &self.time_source
    }

    /// Snapshot of the controller state.
    pub fn stats(&self) -> SproutStats {
        SproutStats {
            window: self.window,
            queue_estimate: self.queue.outstanding(),
            pending_arrivals: self.arrivals.pending(),
            ticks_processed: self.ticks_processed,
            last_forecast: self.last_forecast,
            belief_mean_pps: self.belief.mean(&self.support),
            belief_mode_pps: self.support.value(self.belief.mode_index()),
            forecast_fallbacks: self.forecast_fallbacks,
            belief_resets: self.belief_resets,
            datagrams_sent: self.datagrams_sent,
            retransmits: self.retransmits,
            acks_received: self.acks_received,
            spurious_acks: self.spurious_acks,
            timeout_ms: self.timeout.timeout_ms(),
        }
    }
}
