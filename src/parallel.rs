//! Multi-start execution and the [`solve`] entry point.
//!
//! Every worker runs one complete, independent pass (seed tour, calibration,
//! annealing) with its own random source and its own [`SolutionArena`]. Only
//! the distance matrix is shared, read-only. The run blocks until every
//! worker has finished and keeps the cheapest tour.

use crate::arena::SolutionArena;
use crate::error::{AnnealError, Result};
use crate::matrix::DistanceMatrix;
use crate::moves::{is_permutation, MIN_NODES};
use crate::random::{create_rng, derive_seeds};
use crate::sa::{AnnealingOptions, AnnealingRunner, TemperatureCalibrator};
use crate::seed::{NearestNeighbor, SeedHeuristic};
use std::num::NonZeroUsize;
use std::time::Instant;
use tracing::{debug, info};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Statistics of one worker's pass.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RunSummary {
    /// Worker index, `0..workers`.
    pub worker: usize,
    /// Seed of the worker's random source.
    pub seed: u64,
    /// Cost of the seed tour.
    pub seed_cost: f64,
    /// Best cost the worker reached.
    pub best_cost: f64,
    /// Calibrated initial temperature.
    pub initial_temperature: f64,
    /// Calibrated reheat interval.
    pub reheat_interval: usize,
    /// Candidate evaluations.
    pub iterations: usize,
    /// Outer steps over all passes.
    pub steps: usize,
    /// Passes including restarts.
    pub passes: usize,
    /// Reheats over all passes.
    pub reheats: usize,
}

/// Final tour of a solve together with per-worker statistics.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolveResult {
    /// Best tour over all workers.
    pub tour: Vec<usize>,
    /// Its cycle cost.
    pub cost: f64,
    /// One summary per worker, in worker order. Empty for trivial inputs.
    pub runs: Vec<RunSummary>,
}

/// Solves the instance with nearest-neighbour seeding.
///
/// Instances with 0 or 1 node return the trivial tour at cost 0 without
/// annealing.
///
/// # Errors
///
/// - [`AnnealError::Config`] for invalid options or 2–3 node instances
/// - [`AnnealError::CalibrationNonConvergence`] when a worker cannot
///   calibrate its initial temperature
/// - [`AnnealError::ThreadPool`] when the worker pool cannot be built
///
/// # Examples
///
/// ```
/// use u_tsp_anneal::{solve, AnnealingOptions, DistanceMatrix};
///
/// let pts: [(f64, f64); 5] = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.5, 1.5)];
/// let matrix = DistanceMatrix::from_fn(pts.len(), |i, j| {
///     let (dx, dy) = (pts[i].0 - pts[j].0, pts[i].1 - pts[j].1);
///     (dx * dx + dy * dy).sqrt()
/// });
/// let options = AnnealingOptions::default()
///     .with_annealing_steps(200)
///     .with_parallelism(2)
///     .with_seed(1);
///
/// let result = solve(&matrix, &options).unwrap();
/// assert_eq!(result.tour.len(), 5);
/// assert_eq!(result.runs.len(), 2);
/// ```
pub fn solve(matrix: &DistanceMatrix, options: &AnnealingOptions) -> Result<SolveResult> {
    let heuristic = NearestNeighbor::new(options.seed_trials);
    solve_with(matrix, &heuristic, options)
}

/// Solves the instance starting each worker from `heuristic`'s tour.
pub fn solve_with<S: SeedHeuristic>(
    matrix: &DistanceMatrix,
    heuristic: &S,
    options: &AnnealingOptions,
) -> Result<SolveResult> {
    options.validate()?;

    let n = matrix.size();
    if n <= 1 {
        return Ok(SolveResult {
            tour: (0..n).collect(),
            cost: 0.0,
            runs: Vec::new(),
        });
    }
    if n < MIN_NODES {
        return Err(AnnealError::Config(format!(
            "annealing needs at least {MIN_NODES} nodes, got {n}"
        )));
    }

    ParallelRunner::run(matrix, heuristic, options)
}

/// Fans independent passes out over worker threads and keeps the minimum.
pub struct ParallelRunner;

impl ParallelRunner {
    /// Runs one pass per worker and reduces by minimum cost.
    ///
    /// Ties go to the lowest worker index, so a fixed seed gives a fixed
    /// result regardless of thread scheduling.
    pub fn run<S: SeedHeuristic>(
        matrix: &DistanceMatrix,
        heuristic: &S,
        options: &AnnealingOptions,
    ) -> Result<SolveResult> {
        let workers = Self::worker_count(options);
        let base_seed = options.seed.unwrap_or_else(rand::random);
        let seeds = derive_seeds(base_seed, workers);

        info!(
            event = "solve_start",
            nodes = matrix.size(),
            workers,
            base_seed,
        );
        let started = Instant::now();

        let outcomes = execute(&seeds, |worker, seed| {
            anneal_once(matrix, heuristic, options, worker, seed)
        })?;

        let mut best: Option<(Vec<usize>, f64)> = None;
        let mut runs = Vec::with_capacity(outcomes.len());
        for (tour, summary) in outcomes {
            let better = match &best {
                Some((_, cost)) => summary.best_cost < *cost,
                None => true,
            };
            if better {
                best = Some((tour, summary.best_cost));
            }
            runs.push(summary);
        }
        let (tour, cost) = best.ok_or_else(|| AnnealError::Config("no workers ran".into()))?;

        info!(
            event = "solve_end",
            cost,
            workers,
            duration_ms = started.elapsed().as_millis() as u64,
        );

        Ok(SolveResult { tour, cost, runs })
    }

    /// Configured parallelism, else the available hardware threads, else 1.
    pub fn worker_count(options: &AnnealingOptions) -> usize {
        options.parallelism.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1)
        })
    }
}

#[cfg(feature = "parallel")]
fn execute<T, F>(seeds: &[u64], job: F) -> Result<Vec<T>>
where
    T: Send,
    F: Fn(usize, u64) -> Result<T> + Send + Sync,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(seeds.len())
        .build()
        .map_err(|e| AnnealError::ThreadPool(e.to_string()))?;
    pool.install(|| {
        seeds
            .par_iter()
            .enumerate()
            .map(|(worker, &seed)| job(worker, seed))
            .collect()
    })
}

#[cfg(not(feature = "parallel"))]
fn execute<T, F>(seeds: &[u64], job: F) -> Result<Vec<T>>
where
    F: Fn(usize, u64) -> Result<T>,
{
    seeds
        .iter()
        .enumerate()
        .map(|(worker, &seed)| job(worker, seed))
        .collect()
}

/// One complete independent pass: seed tour, calibration, annealing.
///
/// Returns the best tour and the worker's statistics.
pub fn anneal_once<S: SeedHeuristic>(
    matrix: &DistanceMatrix,
    heuristic: &S,
    options: &AnnealingOptions,
    worker: usize,
    seed: u64,
) -> Result<(Vec<usize>, RunSummary)> {
    let mut rng = create_rng(seed);

    let (seed_tour, seed_cost) = heuristic.seed_tour(matrix, &mut rng);
    if seed_tour.len() != matrix.size() || !is_permutation(&seed_tour) {
        return Err(AnnealError::Config(format!(
            "seed heuristic returned an invalid tour of {} nodes for a {}-node instance",
            seed_tour.len(),
            matrix.size()
        )));
    }

    let actual_cost = matrix.tour_cost(&seed_tour);
    if !cost_matches(seed_cost, actual_cost) {
        return Err(AnnealError::Config(format!(
            "seed heuristic reported cost {seed_cost} for a tour of cost {actual_cost}"
        )));
    }

    let calibration =
        TemperatureCalibrator::new(matrix, options).calibrate(&seed_tour, seed_cost, &mut rng)?;

    let mut arena = SolutionArena::new(matrix, options.prune_size, options.prefer_recent)?;
    let initial = arena.insert(&seed_tour, Some(seed_cost));
    let result = AnnealingRunner::run(
        &mut arena,
        initial,
        &calibration.schedule,
        options,
        &mut rng,
    );

    let tour = arena.tour(result.best).to_vec();
    debug_assert!(is_permutation(&tour), "annealed tour is not a permutation");
    debug!(
        event = "worker_end",
        worker,
        seed_cost,
        best_cost = result.best_cost,
        iterations = result.iterations,
        passes = result.passes,
    );

    Ok((
        tour,
        RunSummary {
            worker,
            seed,
            seed_cost,
            best_cost: result.best_cost,
            initial_temperature: calibration.schedule.initial_temperature,
            reheat_interval: calibration.schedule.reheat_interval,
            iterations: result.iterations,
            steps: result.steps,
            passes: result.passes,
            reheats: result.reheats,
        },
    ))
}

/// Reported and recomputed tour costs agree up to summation order.
fn cost_matches(reported: f64, actual: f64) -> bool {
    reported == actual || (reported - actual).abs() <= 1e-9 * actual.abs().max(1.0)
}
