//! Annealing options.

use crate::error::{AnnealError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for a TSP annealing run.
///
/// The defaults are tuned for instances of up to a few hundred nodes.
///
/// # Examples
///
/// ```
/// use u_tsp_anneal::AnnealingOptions;
///
/// let options = AnnealingOptions::default()
///     .with_annealing_steps(5_000)
///     .with_cooling(0.99)
///     .with_restarts(2)
///     .with_parallelism(1)
///     .with_seed(42);
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct AnnealingOptions {
    /// Maximum number of outer (temperature) steps per pass.
    pub annealing_steps: usize,

    /// Candidate moves evaluated at each temperature before cooling.
    pub steady_steps: usize,

    /// Extra passes after the first one, each restarting from the best tour
    /// found so far at the initial temperature.
    pub restarts: usize,

    /// A pass ends once the temperature drops below this value.
    pub stop_temperature: f64,

    /// A pass ends once the best cost has stayed the same for more than this
    /// many consecutive outer steps.
    pub max_same_best_solution_times: usize,

    /// Target fraction of proposed moves accepted at the initial temperature
    /// (chi_0), in (0, 1). Typical range: 0.8–0.99.
    pub init_acceptance_ratio: f64,

    /// Geometric cooling coefficient (beta), in (0, 1).
    pub cooling: f64,

    /// Decay of the reheat target: the k-th reheat of a pass raises the
    /// temperature to at least `tau_0 * reheat_factor^k`. In (0, 1].
    pub reheat_factor: f64,

    /// Arena slots kept by compaction after each outer step. At least 2.
    pub prune_size: usize,

    /// Keep the most recently grown slots when compacting.
    pub prefer_recent: bool,

    /// Number of independent passes run in parallel.
    ///
    /// `None` uses the available hardware threads.
    pub parallelism: Option<usize>,

    /// Base random seed. `None` draws one from the OS.
    pub seed: Option<u64>,

    /// Nearest-neighbour constructions tried for the initial tour.
    pub seed_trials: usize,

    /// Sample pair count for the Ben-Ameur delta estimate.
    ///
    /// `None` uses `n / 20 + 1`.
    pub sample_pair_size: Option<usize>,

    /// Metropolis trials per calibration attempt.
    pub sample_temperature_iterations: usize,

    /// Calibration attempts before giving up with
    /// [`AnnealError::CalibrationNonConvergence`].
    pub max_calibration_attempts: usize,
}

impl Default for AnnealingOptions {
    fn default() -> Self {
        Self {
            annealing_steps: 25_000,
            steady_steps: 5,
            restarts: 1,
            stop_temperature: 1e-16,
            max_same_best_solution_times: 150,
            init_acceptance_ratio: 0.94,
            cooling: 0.994,
            reheat_factor: 0.8,
            prune_size: 32,
            prefer_recent: true,
            parallelism: None,
            seed: None,
            seed_trials: 10,
            sample_pair_size: None,
            sample_temperature_iterations: 5,
            max_calibration_attempts: 100,
        }
    }
}

impl AnnealingOptions {
    pub fn with_annealing_steps(mut self, n: usize) -> Self {
        self.annealing_steps = n;
        self
    }

    pub fn with_steady_steps(mut self, n: usize) -> Self {
        self.steady_steps = n;
        self
    }

    pub fn with_restarts(mut self, n: usize) -> Self {
        self.restarts = n;
        self
    }

    pub fn with_stop_temperature(mut self, t: f64) -> Self {
        self.stop_temperature = t;
        self
    }

    pub fn with_max_same_best_solution_times(mut self, n: usize) -> Self {
        self.max_same_best_solution_times = n;
        self
    }

    pub fn with_init_acceptance_ratio(mut self, ratio: f64) -> Self {
        self.init_acceptance_ratio = ratio;
        self
    }

    pub fn with_cooling(mut self, beta: f64) -> Self {
        self.cooling = beta;
        self
    }

    pub fn with_reheat_factor(mut self, factor: f64) -> Self {
        self.reheat_factor = factor;
        self
    }

    pub fn with_prune_size(mut self, n: usize) -> Self {
        self.prune_size = n;
        self
    }

    pub fn with_prefer_recent(mut self, prefer: bool) -> Self {
        self.prefer_recent = prefer;
        self
    }

    pub fn with_parallelism(mut self, threads: usize) -> Self {
        self.parallelism = Some(threads);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_seed_trials(mut self, n: usize) -> Self {
        self.seed_trials = n;
        self
    }

    pub fn with_sample_pair_size(mut self, n: usize) -> Self {
        self.sample_pair_size = Some(n);
        self
    }

    pub fn with_sample_temperature_iterations(mut self, n: usize) -> Self {
        self.sample_temperature_iterations = n;
        self
    }

    pub fn with_max_calibration_attempts(mut self, n: usize) -> Self {
        self.max_calibration_attempts = n;
        self
    }

    /// Sample pair count used for an instance of `n` nodes.
    pub fn sample_pairs_for(&self, n: usize) -> usize {
        self.sample_pair_size.unwrap_or(n / 20 + 1).max(1)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        let fail = |msg: String| Err(AnnealError::Config(msg));

        if self.annealing_steps == 0 {
            return fail("annealing_steps must be positive".into());
        }
        if self.steady_steps == 0 {
            return fail("steady_steps must be positive".into());
        }
        if !(self.stop_temperature >= 0.0 && self.stop_temperature.is_finite()) {
            return fail(format!(
                "stop_temperature must be finite and non-negative, got {}",
                self.stop_temperature
            ));
        }
        if self.max_same_best_solution_times == 0 {
            return fail("max_same_best_solution_times must be positive".into());
        }
        if !(self.init_acceptance_ratio > 0.0 && self.init_acceptance_ratio < 1.0) {
            return fail(format!(
                "init_acceptance_ratio must be in (0, 1), got {}",
                self.init_acceptance_ratio
            ));
        }
        if !(self.cooling > 0.0 && self.cooling < 1.0) {
            return fail(format!("cooling must be in (0, 1), got {}", self.cooling));
        }
        if !(self.reheat_factor > 0.0 && self.reheat_factor <= 1.0) {
            return fail(format!(
                "reheat_factor must be in (0, 1], got {}",
                self.reheat_factor
            ));
        }
        if self.prune_size < 2 {
            return fail(format!(
                "prune_size must be at least 2, got {}",
                self.prune_size
            ));
        }
        if self.parallelism == Some(0) {
            return fail("parallelism must be positive".into());
        }
        if self.seed_trials == 0 {
            return fail("seed_trials must be positive".into());
        }
        if self.sample_pair_size == Some(0) {
            return fail("sample_pair_size must be positive".into());
        }
        if self.sample_temperature_iterations == 0 {
            return fail("sample_temperature_iterations must be positive".into());
        }
        if self.max_calibration_attempts == 0 {
            return fail("max_calibration_attempts must be positive".into());
        }
        Ok(())
    }
}
