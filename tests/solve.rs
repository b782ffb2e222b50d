//! End-to-end solves through the public entry points.

use rand::Rng;
use u_tsp_anneal::moves::is_permutation;
use u_tsp_anneal::{
    solve, solve_with, AnnealError, AnnealingOptions, DistanceMatrix, NearestNeighbor,
    SeedHeuristic,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn euclidean(points: &[(f64, f64)]) -> DistanceMatrix {
    DistanceMatrix::from_fn(points.len(), |i, j| {
        let (dx, dy) = (points[i].0 - points[j].0, points[i].1 - points[j].1);
        (dx * dx + dy * dy).sqrt()
    })
}

fn ring(n: usize, radius: f64) -> Vec<(f64, f64)> {
    (0..n)
        .map(|k| {
            let a = std::f64::consts::TAU * k as f64 / n as f64;
            (radius * a.cos(), radius * a.sin())
        })
        .collect()
}

fn options() -> AnnealingOptions {
    AnnealingOptions::default()
        .with_annealing_steps(2_000)
        .with_seed(2024)
}

#[test]
fn unit_square_reaches_perimeter() {
    init_tracing();
    let m = euclidean(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
    let result = solve(&m, &options().with_parallelism(2)).unwrap();

    assert!((result.cost - 4.0).abs() < 1e-9, "cost {}", result.cost);
    assert!(is_permutation(&result.tour));
    assert_eq!(result.tour.len(), 4);
    assert!((m.tour_cost(&result.tour) - result.cost).abs() < 1e-9);
}

#[test]
fn ring_never_worse_than_seed() {
    init_tracing();
    let m = euclidean(&ring(24, 5.0));
    let result = solve(&m, &options().with_parallelism(4)).unwrap();

    assert_eq!(result.runs.len(), 4);
    for run in &result.runs {
        assert!(run.best_cost <= run.seed_cost + 1e-9);
        assert!(run.initial_temperature > 0.0);
        assert!(run.reheat_interval >= 100);
        assert!(run.passes >= 1);
    }
    let perimeter = 24.0 * 2.0 * 5.0 * (std::f64::consts::PI / 24.0).sin();
    assert!(result.cost >= perimeter - 1e-9);
    assert!(result.cost < perimeter * 1.2);
}

#[test]
fn trivial_instances() {
    let none = DistanceMatrix::from_fn(0, |_, _| 0.0);
    let r = solve(&none, &options()).unwrap();
    assert!(r.tour.is_empty());
    assert_eq!(r.cost, 0.0);

    let one = DistanceMatrix::from_fn(1, |_, _| 0.0);
    let r = solve(&one, &options()).unwrap();
    assert_eq!(r.tour, vec![0]);
    assert_eq!(r.cost, 0.0);
}

#[test]
fn small_instances_rejected() {
    for n in [2, 3] {
        let m = euclidean(&ring(n, 1.0));
        match solve(&m, &options()) {
            Err(AnnealError::Config(msg)) => assert!(msg.contains("at least 4")),
            other => panic!("expected config error, got {other:?}"),
        }
    }
}

#[test]
fn invalid_options_rejected_before_work() {
    let m = euclidean(&ring(8, 1.0));
    let bad = [
        options().with_cooling(1.0),
        options().with_reheat_factor(3.0),
        options().with_init_acceptance_ratio(0.0),
        options().with_prune_size(1),
        options().with_parallelism(0),
        options().with_steady_steps(0),
    ];
    for o in &bad {
        assert!(matches!(solve(&m, o), Err(AnnealError::Config(_))));
    }
}

#[test]
fn fixed_seed_is_reproducible() {
    let m = euclidean(&ring(15, 3.0));
    for threads in [1, 3] {
        let o = options().with_annealing_steps(500).with_parallelism(threads);
        let a = solve(&m, &o).unwrap();
        let b = solve(&m, &o).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn from_rows_round_trip_solves() {
    let rows = vec![
        vec![0.0, 2.0, 9.0, 10.0, 7.0],
        vec![2.0, 0.0, 6.0, 4.0, 3.0],
        vec![9.0, 6.0, 0.0, 8.0, 5.0],
        vec![10.0, 4.0, 8.0, 0.0, 6.0],
        vec![7.0, 3.0, 5.0, 6.0, 0.0],
    ];
    let m = DistanceMatrix::from_rows(&rows).unwrap();
    let result = solve(&m, &options().with_parallelism(2)).unwrap();
    assert!(is_permutation(&result.tour));
    assert!((m.tour_cost(&result.tour) - result.cost).abs() < 1e-9);
}

/// Identity ordering, ignoring the random source.
struct Identity;

impl SeedHeuristic for Identity {
    fn seed_tour<R: Rng>(&self, matrix: &DistanceMatrix, _: &mut R) -> (Vec<usize>, f64) {
        let tour: Vec<usize> = (0..matrix.size()).collect();
        let cost = matrix.tour_cost(&tour);
        (tour, cost)
    }
}

#[test]
fn custom_seed_heuristic() {
    let mut points = ring(12, 4.0);
    // Interleave so the identity order zig-zags across the ring.
    points.sort_by_key(|p| ((p.0 * 1000.0) as i64).rem_euclid(7));
    let m = euclidean(&points);
    let start = m.tour_cost(&(0..12).collect::<Vec<_>>());

    let result = solve_with(&m, &Identity, &options().with_parallelism(2)).unwrap();
    for run in &result.runs {
        assert!((run.seed_cost - start).abs() < 1e-9);
    }
    assert!(result.cost <= start);
}

#[test]
fn nearest_neighbor_trials_configurable() {
    let m = euclidean(&ring(10, 2.0));
    let heuristic = NearestNeighbor::new(1);
    let result = solve_with(&m, &heuristic, &options().with_parallelism(1)).unwrap();
    assert_eq!(result.runs.len(), 1);
    assert!(is_permutation(&result.tour));
}
