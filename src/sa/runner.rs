//! Annealing execution loop.

use super::config::AnnealingOptions;
use super::types::{AnnealingState, Phase, Schedule, SolutionPool};
use rand::Rng;
use tracing::{debug, trace};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Result of an annealing run over a [`SolutionPool`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnnealResult<H> {
    /// Handle of the best solution found; still live in the pool.
    pub best: H,

    /// Cost of the best solution.
    pub best_cost: f64,

    /// Total candidate evaluations.
    pub iterations: usize,

    /// Total outer (temperature) steps over all passes.
    pub steps: usize,

    /// Passes run, including the first one.
    pub passes: usize,

    /// Reheats over all passes.
    pub reheats: usize,

    /// Temperature when the last pass stopped.
    pub final_temperature: f64,

    /// Accepted moves, including improvements.
    pub accepted_moves: usize,

    /// Accepted moves that lowered the current cost.
    pub improving_moves: usize,

    /// Best cost after each outer step, starting with the initial cost.
    pub cost_history: Vec<f64>,
}

/// Metropolis criterion for a cost change `delta` at `temperature`.
///
/// Downhill moves are always accepted without consuming randomness;
/// uphill (and neutral) moves are accepted with probability
/// `exp(-delta / temperature)`, never at a non-positive temperature.
pub fn metropolis<R: Rng>(delta: f64, temperature: f64, rng: &mut R) -> bool {
    if delta < 0.0 {
        true
    } else if temperature > 0.0 {
        rng.random::<f64>() < (-delta / temperature).exp()
    } else {
        false
    }
}

/// Drives the cooling / reheating / restart state machine.
pub struct AnnealingRunner;

impl AnnealingRunner {
    /// Anneals from `initial` until every pass has finished.
    ///
    /// The pool ends up holding only the returned best handle (plus the
    /// final current handle when it differs).
    pub fn run<P, R>(
        pool: &mut P,
        initial: P::Handle,
        schedule: &Schedule,
        options: &AnnealingOptions,
        rng: &mut R,
    ) -> AnnealResult<P::Handle>
    where
        P: SolutionPool,
        R: Rng,
    {
        let mut current = initial;
        let mut current_cost = pool.fitness(current);
        let mut best = current;
        let mut best_cost = current_cost;

        let mut state = AnnealingState::new(schedule.initial_temperature);
        let mut iterations = 0usize;
        let mut steps = 0usize;
        let mut reheats = 0usize;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;

        let mut cost_history = Vec::new();
        cost_history.push(best_cost);

        loop {
            debug!(
                event = "pass_start",
                pass = state.restarts,
                temperature = state.temperature,
                best_cost,
            );

            while !state.pass_finished(options) {
                let mut improved = false;

                for _ in 0..options.steady_steps {
                    let candidate = pool.neighbor(current, rng);
                    let candidate_cost = pool.fitness(candidate);
                    iterations += 1;

                    let delta = candidate_cost - current_cost;
                    if !metropolis(delta, state.temperature, rng) {
                        pool.release(candidate);
                        continue;
                    }

                    accepted_moves += 1;
                    if delta < 0.0 {
                        improving_moves += 1;
                    }
                    if current != best {
                        pool.release(current);
                    }
                    current = candidate;
                    current_cost = candidate_cost;

                    if current_cost < best_cost {
                        // The previous best is referenced by neither anchor now.
                        pool.release(best);
                        best = current;
                        best_cost = current_cost;
                        improved = true;
                    }
                }

                state.finish_step(schedule, options);
                if state.phase == Phase::Reheating {
                    reheats += 1;
                    trace!(
                        event = "reheat",
                        step = state.step,
                        temperature = state.temperature,
                    );
                }

                (best, current) = pool.retain(best, current);
                state.record_best(improved);
                steps += 1;
                cost_history.push(best_cost);
            }

            debug!(
                event = "pass_end",
                pass = state.restarts,
                steps = state.step,
                temperature = state.temperature,
                best_cost,
            );

            if state.restarts < options.restarts {
                state.restart(schedule.initial_temperature);
                if current != best {
                    pool.release(current);
                    current = best;
                    current_cost = best_cost;
                }
                trace!(event = "restart", restart = state.restarts, best_cost);
            } else {
                state.terminate();
                break;
            }
        }

        AnnealResult {
            best,
            best_cost,
            iterations,
            steps,
            passes: state.restarts + 1,
            reheats,
            final_temperature: state.temperature,
            accepted_moves,
            improving_moves,
            cost_history,
        }
    }
}
