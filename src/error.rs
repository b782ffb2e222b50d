//! Error types for the annealing engine.

use thiserror::Error;

/// Errors surfaced by [`solve`](crate::solve) and its building blocks.
///
/// Arena misuse (reusing a destroyed handle) and tours that stop being
/// permutations are programming defects, not variants here: they are
/// checked with `debug_assert!` and abort debug builds.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnnealError {
    /// Invalid option combination or an instance the operators cannot handle.
    #[error("configuration error: {0}")]
    Config(String),

    /// The Ben-Ameur retry loop never reached the target acceptance ratio.
    #[error(
        "temperature calibration did not reach acceptance ratio {target} after {attempts} \
         attempts (last ratio {achieved}, temperature {temperature})"
    )]
    CalibrationNonConvergence {
        /// Requested initial acceptance ratio (chi_0).
        target: f64,
        /// Ratio measured on the last attempt.
        achieved: f64,
        /// Number of attempts made.
        attempts: usize,
        /// Temperature used on the last attempt.
        temperature: f64,
    },

    /// The worker thread pool could not be created.
    #[error("thread pool error: {0}")]
    ThreadPool(String),
}

/// Result type alias for annealing operations.
pub type Result<T> = std::result::Result<T, AnnealError>;
