//! Initial tour construction.

use crate::matrix::DistanceMatrix;
use rand::Rng;

/// Produces the feasible tour an annealing pass starts from.
///
/// Implementations must return a permutation of `0..matrix.size()` together
/// with its cycle cost as [`DistanceMatrix::tour_cost`] computes it. The heuristic is shared read-only between worker
/// threads, hence `Send + Sync`.
pub trait SeedHeuristic: Send + Sync {
    /// Builds an initial tour and its cost.
    fn seed_tour<R: Rng>(&self, matrix: &DistanceMatrix, rng: &mut R) -> (Vec<usize>, f64);
}

/// Best of several nearest-neighbour constructions, each from a random
/// start node.
#[derive(Debug, Clone, Copy)]
pub struct NearestNeighbor {
    /// Number of constructions; the cheapest tour wins.
    pub trials: usize,
}

impl Default for NearestNeighbor {
    fn default() -> Self {
        Self { trials: 10 }
    }
}

impl NearestNeighbor {
    pub fn new(trials: usize) -> Self {
        Self {
            trials: trials.max(1),
        }
    }

    /// Greedy tour from `start`: always move to the closest unvisited node.
    pub fn construct(matrix: &DistanceMatrix, start: usize) -> Vec<usize> {
        let n = matrix.size();
        let mut visited = vec![false; n];
        let mut tour = Vec::with_capacity(n);
        let mut node = start;
        visited[node] = true;
        tour.push(node);

        // Nothing but the start is visited yet, so the first hop is the
        // start's overall nearest neighbour.
        if let Some(first) = matrix.closest_node(start) {
            visited[first] = true;
            tour.push(first);
            node = first;
        }

        while tour.len() < n {
            let next = (0..n)
                .filter(|&j| !visited[j])
                .min_by(|&a, &b| matrix.at(node, a).total_cmp(&matrix.at(node, b)));
            match next {
                Some(j) => {
                    visited[j] = true;
                    tour.push(j);
                    node = j;
                }
                None => break,
            }
        }
        tour
    }
}

impl SeedHeuristic for NearestNeighbor {
    fn seed_tour<R: Rng>(&self, matrix: &DistanceMatrix, rng: &mut R) -> (Vec<usize>, f64) {
        let n = matrix.size();
        if n == 0 {
            return (Vec::new(), 0.0);
        }

        let mut best_tour = Vec::new();
        let mut best_cost = f64::INFINITY;
        for _ in 0..self.trials.max(1) {
            let start = rng.random_range(0..n);
            let tour = Self::construct(matrix, start);
            let cost = matrix.tour_cost(&tour);
            if cost < best_cost {
                best_cost = cost;
                best_tour = tour;
            }
        }
        (best_tour, best_cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::is_permutation;
    use crate::random::create_rng;

    fn line(n: usize) -> DistanceMatrix {
        DistanceMatrix::from_fn(n, |i, j| (i as f64 - j as f64).abs())
    }

    #[test]
    fn test_construct_from_end_walks_line() {
        let m = line(6);
        assert_eq!(NearestNeighbor::construct(&m, 0), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_construct_first_hop_is_closest_node() {
        let m = DistanceMatrix::from_fn(9, |i, j| ((i * 5 + j * 5 + i * j) % 13 + 1) as f64);
        for start in 0..9 {
            let tour = NearestNeighbor::construct(&m, start);
            assert!(is_permutation(&tour));
            assert_eq!(tour[0], start);
            assert_eq!(Some(tour[1]), m.closest_node(start));
        }
    }

    #[test]
    fn test_construct_single_node() {
        assert_eq!(NearestNeighbor::construct(&line(1), 0), vec![0]);
    }

    #[test]
    fn test_seed_tour_is_permutation_with_matching_cost() {
        let m = DistanceMatrix::from_fn(12, |i, j| ((i * 7 + j * 3) % 11 + 1) as f64);
        let mut rng = create_rng(3);
        let (tour, cost) = NearestNeighbor::default().seed_tour(&m, &mut rng);
        assert!(is_permutation(&tour));
        assert!((m.tour_cost(&tour) - cost).abs() < 1e-9);
    }

    #[test]
    fn test_best_of_trials_not_worse_than_single() {
        let m = DistanceMatrix::from_fn(15, |i, j| ((i * i + j * j) % 17 + 1) as f64);
        let mut rng = create_rng(11);
        let (_, many) = NearestNeighbor::new(20).seed_tour(&m, &mut rng);
        let worst_single = (0..15)
            .map(|s| m.tour_cost(&NearestNeighbor::construct(&m, s)))
            .fold(f64::NEG_INFINITY, f64::max);
        assert!(many <= worst_single);
    }

    #[test]
    fn test_empty_matrix() {
        let m = line(0);
        let mut rng = create_rng(1);
        let (tour, cost) = NearestNeighbor::default().seed_tour(&m, &mut rng);
        assert!(tour.is_empty());
        assert_eq!(cost, 0.0);
    }
}
