//! Initial temperature calibration.
//!
//! Derives tau_0 from the instance instead of a fixed constant, following
//! Ben-Ameur: estimate the mean cost change of a neighbourhood move, set
//! `tau_0 = delta / ln(1 / chi_0)` and raise it until a short Metropolis run
//! from the initial tour accepts at least a `chi_0` share of its proposals.
//!
//! # References
//!
//! Ben-Ameur (2004), "Computing the Initial Temperature of Simulated
//! Annealing", *Computational Optimization and Applications* 29, 369-385.

use super::config::AnnealingOptions;
use super::runner::metropolis;
use super::types::Schedule;
use crate::error::{AnnealError, Result};
use crate::matrix::DistanceMatrix;
use crate::moves;
use rand::Rng;
use tracing::debug;

/// Growth applied to the candidate temperature after a failed attempt.
const TEMPERATURE_GROWTH: f64 = 1.5;

/// `rho = max(tau_0 / REHEAT_DIVISOR, MIN_REHEAT_INTERVAL)`.
const REHEAT_DIVISOR: f64 = 4000.0;
const MIN_REHEAT_INTERVAL: usize = 100;

/// Outcome of a calibration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    /// The derived tau_0 and rho.
    pub schedule: Schedule,
    /// Mean absolute cost delta used as the starting estimate.
    pub mean_delta: f64,
    /// Acceptance ratio measured at the returned temperature.
    pub acceptance_ratio: f64,
    /// Metropolis attempts it took to reach the target.
    pub attempts: usize,
}

/// Ben-Ameur calibrator for one instance.
#[derive(Debug, Clone)]
pub struct TemperatureCalibrator<'m> {
    matrix: &'m DistanceMatrix,
    target: f64,
    sample_pairs: usize,
    trial_iterations: usize,
    max_attempts: usize,
}

impl<'m> TemperatureCalibrator<'m> {
    pub fn new(matrix: &'m DistanceMatrix, options: &AnnealingOptions) -> Self {
        Self {
            matrix,
            target: options.init_acceptance_ratio,
            sample_pairs: options.sample_pairs_for(matrix.size()),
            trial_iterations: options.sample_temperature_iterations.max(1),
            max_attempts: options.max_calibration_attempts.max(1),
        }
    }

    /// Computes tau_0 and rho for a pass starting from `initial`.
    ///
    /// # Errors
    ///
    /// [`AnnealError::CalibrationNonConvergence`] when the acceptance target
    /// is not met within `max_calibration_attempts` attempts.
    pub fn calibrate<R: Rng>(
        &self,
        initial: &[usize],
        initial_cost: f64,
        rng: &mut R,
    ) -> Result<Calibration> {
        let mut delta = self.mean_delta(initial, rng);
        if !(delta > 0.0 && delta.is_finite()) {
            // Cost-neutral sample moves: fall back to the mean edge weight.
            let mean_edge = initial_cost / initial.len().max(1) as f64;
            delta = if mean_edge > 0.0 && mean_edge.is_finite() {
                mean_edge
            } else {
                1.0
            };
        }

        let mut temperature = delta / (1.0 / self.target).ln();
        let mut last_temperature = temperature;
        let mut achieved = 0.0;

        for attempt in 1..=self.max_attempts {
            if !temperature.is_finite() {
                break;
            }
            last_temperature = temperature;
            achieved = self.acceptance_ratio(initial, initial_cost, temperature, rng);
            if achieved >= self.target {
                let reheat_interval =
                    ((temperature / REHEAT_DIVISOR) as usize).max(MIN_REHEAT_INTERVAL);
                debug!(
                    event = "calibrated",
                    initial_temperature = temperature,
                    reheat_interval,
                    mean_delta = delta,
                    acceptance_ratio = achieved,
                    attempts = attempt,
                );
                return Ok(Calibration {
                    schedule: Schedule {
                        initial_temperature: temperature,
                        reheat_interval,
                    },
                    mean_delta: delta,
                    acceptance_ratio: achieved,
                    attempts: attempt,
                });
            }
            temperature *= TEMPERATURE_GROWTH;
        }

        Err(AnnealError::CalibrationNonConvergence {
            target: self.target,
            achieved,
            attempts: self.max_attempts,
            temperature: last_temperature,
        })
    }

    /// Mean `|cost(n1) - cost(n2)|` over `2 * sample_pairs` chained move
    /// pairs `n1 = move(initial)`, `n2 = move(n1)`.
    pub fn mean_delta<R: Rng>(&self, initial: &[usize], rng: &mut R) -> f64 {
        let trials = 2 * self.sample_pairs;
        let mut first = vec![0; initial.len()];
        let mut second = vec![0; initial.len()];
        let mut total = 0.0;
        for _ in 0..trials {
            moves::perturb(initial, &mut first, rng);
            moves::perturb(&first, &mut second, rng);
            total += (self.matrix.tour_cost(&first) - self.matrix.tour_cost(&second)).abs();
        }
        total / trials as f64
    }

    /// Share of Metropolis decisions accepted at `temperature` over a short
    /// chain starting from `initial`.
    pub fn acceptance_ratio<R: Rng>(
        &self,
        initial: &[usize],
        initial_cost: f64,
        temperature: f64,
        rng: &mut R,
    ) -> f64 {
        let mut current = initial.to_vec();
        let mut current_cost = initial_cost;
        let mut next = vec![0; initial.len()];
        let mut accepted = 0usize;

        for _ in 0..self.trial_iterations {
            moves::perturb(&current, &mut next, rng);
            let next_cost = self.matrix.tour_cost(&next);
            if metropolis(next_cost - current_cost, temperature, rng) {
                std::mem::swap(&mut current, &mut next);
                current_cost = next_cost;
                accepted += 1;
            }
        }
        accepted as f64 / self.trial_iterations as f64
    }
}
