//! Core trait and state for the annealing controller.

use super::config::AnnealingOptions;
use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Storage the controller anneals over.
///
/// The controller only ever holds two handles, `best` and `current`; every
/// other handle it obtains from [`neighbor`](SolutionPool::neighbor) is
/// either promoted to one of them or released.
///
/// # Examples
///
/// ```ignore
/// impl SolutionPool for MyPool {
///     type Handle = usize;
///
///     fn fitness(&mut self, h: usize) -> f64 { self.costs[h] }
///     fn neighbor<R: Rng>(&mut self, h: usize, rng: &mut R) -> usize { /* ... */ }
///     fn release(&mut self, h: usize) { self.free.push(h) }
///     fn retain(&mut self, best: usize, current: usize) -> (usize, usize) { (best, current) }
/// }
/// ```
pub trait SolutionPool {
    /// Value identifying a stored solution.
    type Handle: Copy + PartialEq + std::fmt::Debug;

    /// Cost of the solution. Lower is better.
    fn fitness(&mut self, handle: Self::Handle) -> f64;

    /// Stores a random neighbour of `handle` and returns its handle.
    fn neighbor<R: Rng>(&mut self, handle: Self::Handle, rng: &mut R) -> Self::Handle;

    /// Gives the storage behind `handle` back to the pool.
    fn release(&mut self, handle: Self::Handle);

    /// Drops everything except `best` and `current`, returning their
    /// possibly remapped handles.
    fn retain(
        &mut self,
        best: Self::Handle,
        current: Self::Handle,
    ) -> (Self::Handle, Self::Handle);
}

/// Per-instance temperature schedule produced by calibration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Schedule {
    /// Initial temperature (tau_0).
    pub initial_temperature: f64,
    /// Reheat every this many outer steps (rho).
    pub reheat_interval: usize,
}

/// Phase of the annealing state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Phase {
    Cooling,
    Reheating,
    Restarting,
    Terminated,
}

/// Mutable state of one annealing run.
///
/// Each transition is a method so it can be exercised on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnealingState {
    /// Current temperature.
    pub temperature: f64,
    /// Outer steps completed in the current pass.
    pub step: usize,
    /// Restarts performed so far.
    pub restarts: usize,
    /// Reheats performed in the current pass.
    pub reheats: usize,
    /// Consecutive outer steps without a new best.
    pub same_best: usize,
    pub phase: Phase,
}

impl AnnealingState {
    pub fn new(initial_temperature: f64) -> Self {
        Self {
            temperature: initial_temperature,
            step: 0,
            restarts: 0,
            reheats: 0,
            same_best: 0,
            phase: Phase::Cooling,
        }
    }

    /// `T <- T * beta`.
    pub fn cool(&mut self, beta: f64) {
        self.temperature *= beta;
        self.phase = Phase::Cooling;
    }

    /// Raises the temperature to at least `tau_0 * factor^k`, where `k` is
    /// the number of reheats so far in this pass including this one.
    pub fn reheat(&mut self, initial_temperature: f64, factor: f64) {
        self.reheats += 1;
        let exponent = i32::try_from(self.reheats).unwrap_or(i32::MAX);
        let target = initial_temperature * factor.powi(exponent);
        self.temperature = self.temperature.max(target);
        self.phase = Phase::Reheating;
    }

    /// Closes an outer step: cools, then reheats on interval boundaries.
    pub fn finish_step(&mut self, schedule: &Schedule, options: &AnnealingOptions) {
        self.step += 1;
        self.cool(options.cooling);
        if schedule.reheat_interval > 0 && self.step % schedule.reheat_interval == 0 {
            self.reheat(schedule.initial_temperature, options.reheat_factor);
        }
    }

    /// Updates the same-best streak.
    pub fn record_best(&mut self, improved: bool) {
        if improved {
            self.same_best = 0;
        } else {
            self.same_best += 1;
        }
    }

    /// Whether the current pass should stop.
    pub fn pass_finished(&self, options: &AnnealingOptions) -> bool {
        self.step >= options.annealing_steps
            || self.temperature < options.stop_temperature
            || self.same_best > options.max_same_best_solution_times
    }

    /// Starts another pass at the initial temperature.
    pub fn restart(&mut self, initial_temperature: f64) {
        self.restarts += 1;
        self.temperature = initial_temperature;
        self.step = 0;
        self.reheats = 0;
        self.same_best = 0;
        self.phase = Phase::Restarting;
    }

    pub fn terminate(&mut self) {
        self.phase = Phase::Terminated;
    }
}
