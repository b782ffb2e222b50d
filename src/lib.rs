//! Simulated annealing for the Traveling Salesman Problem.
//!
//! Starting from a greedy nearest-neighbour tour, each worker anneals with a
//! fixed family of tour moves (2-opt, translate, switching) at an initial
//! temperature calibrated from the instance itself. Workers run in parallel
//! with independent seeds and the cheapest tour wins.
//!
//! - [`DistanceMatrix`]: symmetric O(1) distance oracle.
//! - [`SeedHeuristic`] / [`NearestNeighbor`]: initial tour construction.
//! - [`SolutionArena`]: pooled tour storage with value handles and
//!   compaction.
//! - [`moves`]: the three perturbation operators.
//! - [`sa`]: temperature calibration and the annealing state machine.
//! - [`solve`]: multi-start entry point.
//!
//! # Example
//!
//! ```
//! use u_tsp_anneal::{solve, AnnealingOptions, DistanceMatrix};
//!
//! let pts: [(f64, f64); 6] = [
//!     (0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0), (1.0, 3.0), (3.0, 1.0),
//! ];
//! let matrix = DistanceMatrix::from_fn(pts.len(), |i, j| {
//!     let (dx, dy) = (pts[i].0 - pts[j].0, pts[i].1 - pts[j].1);
//!     (dx * dx + dy * dy).sqrt()
//! });
//!
//! let result = solve(&matrix, &AnnealingOptions::default().with_seed(7)).unwrap();
//! assert_eq!(result.tour.len(), pts.len());
//! assert!((matrix.tour_cost(&result.tour) - result.cost).abs() < 1e-9);
//! ```

pub mod arena;
pub mod error;
pub mod matrix;
pub mod moves;
pub mod parallel;
pub mod random;
pub mod sa;
pub mod seed;

pub use arena::{Handle, SolutionArena};
pub use error::{AnnealError, Result};
pub use matrix::DistanceMatrix;
pub use parallel::{solve, solve_with, ParallelRunner, RunSummary, SolveResult};
pub use sa::AnnealingOptions;
pub use seed::{NearestNeighbor, SeedHeuristic};
