//! Belief diffusion between observations.
//!
//! The decay kernel mixes every bucket with a uniform floor:
//!
//! ```text
//! m'(s) = m(s) * decay + (1 - decay) * floor_mass
//! ```
//!
//! followed by renormalisation. Repeated application pulls the belief back
//! towards uniform, so a stale estimate widens until fresh acknowledgments pin
//! it down again.
//!
//! The gaussian kernel instead spreads each bucket over its neighbours with a
//! normal density of fixed width, which keeps the belief local to the current
//! estimate instead of leaking mass to distant rates.

use statrs::distribution::{Continuous, Normal};

use super::belief::{BeliefDistribution, Normalization};
use super::config::{DiffusionKernel, SproutConfig};
use super::support::RateSupport;

/// One diffusion step, prepared for a given support.
#[derive(Debug, Clone)]
pub enum DiffusionStep {
    Decay {
        decay_factor: f64,
        floor_mass: f64,
    },
    Gaussian {
        /// Kernel weight indexed by bucket distance.
        weights: Vec<f64>,
    },
}

impl DiffusionStep {
    pub fn from_config(config: &SproutConfig, support: &RateSupport) -> Self {
        match config.diffusion {
            DiffusionKernel::Decay => Self::Decay {
                decay_factor: config.decay_factor,
                floor_mass: config.floor_mass(),
            },
            DiffusionKernel::Gaussian { std_dev_pps } => {
                Self::gaussian(std_dev_pps, support.step(), support.len())
            }
        }
    }

    fn gaussian(std_dev_pps: f64, step: f64, buckets: usize) -> Self {
        let weights = match Normal::new(0.0, std_dev_pps) {
            Ok(normal) => (0..buckets).map(|d| normal.pdf(d as f64 * step)).collect(),
            // Rejected by config validation; a point mass keeps the belief unchanged.
            Err(_) => {
                let mut weights = vec![0.0; buckets];
                if let Some(w) = weights.first_mut() {
                    *w = 1.0;
                }
                weights
            }
        };
        Self::Gaussian { weights }
    }

    /// Applies one step in place.
    pub fn apply(&self, belief: &mut BeliefDistribution) -> Normalization {
        match self {
            Self::Decay {
                decay_factor,
                floor_mass,
            } => {
                let floor = (1.0 - decay_factor) * floor_mass;
                for m in belief.masses_mut() {
                    *m = *m * decay_factor + floor;
                }
            }
            Self::Gaussian { weights } => {
                let spread: Vec<f64> = {
                    let mass = belief.masses();
                    (0..mass.len())
                        .map(|i| {
                            mass.iter()
                                .enumerate()
                                .map(|(j, m)| m * weights[i.abs_diff(j)])
                                .sum()
                        })
                        .collect()
                };
                belief.masses_mut().copy_from_slice(&spread);
            }
        }
        belief.normalize()
    }
}
