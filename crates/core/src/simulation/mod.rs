//! Time and randomness plumbing shared by the controllers and their tests.
//!
//! Controllers are generic over a [`TimeSource`] so that production code reads
//! a monotonic wall clock while tests step a [`VirtualTime`] tick by tick. The
//! seeded [`SimulationRng`] is only compiled for tests.

#[cfg(test)]
mod rng;
mod time;

#[cfg(test)]
pub(crate) use rng::SimulationRng;
pub use time::{RealTime, TimeSource, VirtualTime};
