//! Property tests for moves, arena bookkeeping and cost caching.

use proptest::prelude::*;
use rand::seq::SliceRandom;
use u_tsp_anneal::moves::{is_permutation, perturb, sample_cut};
use u_tsp_anneal::random::create_rng;
use u_tsp_anneal::{DistanceMatrix, SolutionArena};

fn matrix(n: usize, salt: u64) -> DistanceMatrix {
    DistanceMatrix::from_fn(n, |i, j| {
        let h = (i as u64 * 2654435761) ^ (j as u64 * 40503) ^ salt;
        (h % 97 + 1) as f64
    })
}

fn shuffled(n: usize, seed: u64) -> Vec<usize> {
    let mut tour: Vec<usize> = (0..n).collect();
    tour.shuffle(&mut create_rng(seed));
    tour
}

proptest! {
    #[test]
    fn cut_points_in_range(n in 4usize..200, seed in any::<u64>()) {
        let mut rng = create_rng(seed);
        for _ in 0..20 {
            let (x, y) = sample_cut(n, &mut rng);
            prop_assert!(x >= 1 && x <= n - 2);
            prop_assert!(y >= x + 2 && y <= n);
        }
    }

    #[test]
    fn perturb_keeps_permutation(n in 4usize..64, seed in any::<u64>(), rounds in 1usize..30) {
        let mut rng = create_rng(seed);
        let mut src = shuffled(n, seed);
        let mut dst = vec![0; n];
        for _ in 0..rounds {
            perturb(&src, &mut dst, &mut rng);
            prop_assert!(is_permutation(&dst));
            prop_assert_eq!(dst[0], src[0]);
            std::mem::swap(&mut src, &mut dst);
        }
    }

    #[test]
    fn neighbor_cost_matches_tour(n in 4usize..40, seed in any::<u64>(), salt in any::<u64>()) {
        let m = matrix(n, salt);
        let mut arena = SolutionArena::new(&m, 16, true).unwrap();
        let mut rng = create_rng(seed);
        let mut h = arena.insert(&shuffled(n, seed), None);
        for _ in 0..10 {
            let next = arena.neighbor(h, &mut rng);
            prop_assert!(is_permutation(arena.tour(next)));
            let cost = arena.fitness(next);
            prop_assert!((cost - m.tour_cost(arena.tour(next))).abs() < 1e-9);
            prop_assert_eq!(arena.cached_cost(next), Some(cost));
            arena.destroy(h);
            h = next;
        }
    }

    #[test]
    fn compaction_bounds_storage_and_keeps_anchors(
        n in 4usize..20,
        seed in any::<u64>(),
        ops in proptest::collection::vec(any::<bool>(), 1..120),
        max_size in 0usize..12,
        prefer_recent in any::<bool>(),
        picks in (any::<usize>(), any::<usize>()),
    ) {
        let m = matrix(n, seed);
        let mut arena = SolutionArena::new(&m, 32, prefer_recent).unwrap();
        let mut live = vec![arena.insert(&shuffled(n, seed), None)];

        for (k, grow) in ops.into_iter().enumerate() {
            if grow || live.len() == 1 {
                live.push(arena.insert(&shuffled(n, seed ^ k as u64), None));
            } else {
                let h = live.swap_remove(k % live.len());
                arena.destroy(h);
            }
        }

        let best = live[picks.0 % live.len()];
        let current = live[picks.1 % live.len()];
        let best_tour = arena.tour(best).to_vec();
        let current_tour = arena.tour(current).to_vec();
        let best_cost = arena.fitness(best);
        let before = arena.len();

        let (new_best, new_current) = arena.compact(best, current, max_size, prefer_recent);

        let budget = max_size.max(2);
        prop_assert!(arena.len() <= before);
        if before > budget {
            prop_assert!(arena.len() <= budget);
            prop_assert_eq!(arena.live_len(), if best == current { 1 } else { 2 });
        }
        prop_assert!(arena.is_live(new_best));
        prop_assert!(arena.is_live(new_current));
        prop_assert_eq!(arena.tour(new_best), &best_tour[..]);
        prop_assert_eq!(arena.tour(new_current), &current_tour[..]);
        prop_assert_eq!(arena.cached_cost(new_best), Some(best_cost));
        prop_assert_eq!(best == current, new_best == new_current);
    }

    #[test]
    fn stale_handles_detected(n in 4usize..12, seed in any::<u64>(), count in 1usize..20) {
        let m = matrix(n, seed);
        let mut arena = SolutionArena::new(&m, 32, true).unwrap();
        let handles: Vec<_> = (0..count)
            .map(|k| arena.insert(&shuffled(n, seed.wrapping_add(k as u64)), None))
            .collect();
        for &h in &handles {
            arena.destroy(h);
        }
        for &h in &handles {
            prop_assert!(!arena.is_live(h));
        }
        let fresh = arena.insert(&shuffled(n, seed), None);
        prop_assert!(!handles.contains(&fresh));
        prop_assert!(fresh.slot() < count);
    }
}
