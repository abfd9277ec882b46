//! Sprout: stochastic forecast congestion control for datagram senders.
//!
//! The controller keeps a discrete belief over the bottleneck link's service
//! rate and refreshes it once per fixed tick using the receiver timestamps of
//! acknowledged datagrams. From that belief it forecasts how many datagrams
//! the link can drain over the next feedback horizon and sizes the window to
//! match.
//!
//! ## Key Concepts
//!
//! - **Rate support**: fixed ascending table of candidate rates (datagrams/sec)
//! - **Belief**: probability mass per candidate rate, always summing to one
//! - **Feedback delay**: acknowledgments describe the link as it was this long ago
//! - **Forecast quantile**: low percentile of the projected belief, biased
//!   below the mean so the sender undershoots rather than overshoots
//!
//! ## Per-Tick Pipeline
//!
//! | Step | Component | Effect |
//! |------|-----------|--------|
//! | Diffuse | [`DiffusionStep`] | Widen the belief for the time that passed |
//! | Count | [`ArrivalAccumulator`] | Arrivals confirmed before `boundary - feedback_delay` |
//! | Update | [`BayesUpdateStep`] | Reweight by the Poisson likelihood of the count |
//! | Forecast | [`Forecaster`] | Project across the horizon, read the quantile |
//! | Set window | [`WindowPolicy`] | `max(round(gain * f - queue + prev), floor)` |
//!
//! Only the last tick of a catch-up runs the forecast and window steps.
//!
//! ## Pull-Based Scheduling
//!
//! There is no timer. [`SproutController::query_window_size`] replays every
//! tick that elapsed since the previous query, so the work done by one query
//! is proportional to the time since the last one.

mod arrivals;
mod belief;
mod config;
mod controller;
mod diffusion;
mod forecast;
mod likelihood;
mod scheduler;
mod stats;
mod support;
mod window;


// Re-export public API
pub use arrivals::ArrivalAccumulator;
pub use belief::{BeliefDistribution, Normalization};
pub use config::{DiffusionKernel, ForecastFallback, SproutConfig};
pub use controller::SproutController;
pub use diffusion::DiffusionStep;
pub use forecast::{Forecast, Forecaster};
pub use likelihood::{poisson_ln_pmf, BayesUpdateStep};
pub use scheduler::{DueTick, TickScheduler};
pub use stats::SproutStats;
pub use support::RateSupport;
pub use window::{TimeoutPolicy, WindowPolicy};
