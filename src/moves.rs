//! Tour perturbation operators.
//!
//! Every operator copies `src` into `dst` with one segment rearranged
//! between two cut indices `x < y`. The prefix `[0, x)` and the suffix
//! `[y, n)` are copied verbatim, and since `x >= 1` node `tour[0]` never
//! moves: anchoring the first position keeps the cyclic representation from
//! proposing a mere rotation of the same cycle.
//!
//! Operator choice is a fixed policy:
//!
//! | operator    | probability | effect on `[x, y)`                      |
//! |-------------|-------------|-----------------------------------------|
//! | 2-opt       | 40%         | reversed                                |
//! | translate   | 40%         | element `y-1` moved to `x`, rest shifted |
//! | switching   | 20%         | elements `x` and `y-1` exchanged         |

use rand::Rng;

/// Smallest tour the operators can perturb without touching position 0.
pub const MIN_NODES: usize = 4;

/// The three neighbourhood moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    /// Segment reversal.
    TwoOpt,
    /// Segment relocation of a single element.
    Translate,
    /// Transposition of the segment end points.
    Switching,
}

impl MoveKind {
    /// Weighted coin flip: 40% 2-opt, 40% translate, 20% switching.
    pub fn choose<R: Rng>(rng: &mut R) -> Self {
        let dice: f64 = rng.random();
        if dice < 0.4 {
            MoveKind::TwoOpt
        } else if dice < 0.8 {
            MoveKind::Translate
        } else {
            MoveKind::Switching
        }
    }

    /// Writes the transformed `src` into `dst`.
    pub fn apply(self, src: &[usize], dst: &mut [usize], x: usize, y: usize) {
        match self {
            MoveKind::TwoOpt => two_opt(src, dst, x, y),
            MoveKind::Translate => translate(src, dst, x, y),
            MoveKind::Switching => switching(src, dst, x, y),
        }
    }
}

/// Samples cut indices with `1 <= x`, `x + 2 <= y <= n`.
///
/// `x` is uniform in `[1, n-2]`, then `y` uniform in `[x+2, n]`.
pub fn sample_cut<R: Rng>(n: usize, rng: &mut R) -> (usize, usize) {
    debug_assert!(n >= MIN_NODES, "cut sampling needs at least {MIN_NODES} nodes, got {n}");
    let x = rng.random_range(1..=n - 2);
    let y = rng.random_range(x + 2..=n);
    (x, y)
}

/// Draws a random move and cut and writes the neighbour of `src` into `dst`.
///
/// Returns the operator that was applied.
pub fn perturb<R: Rng>(src: &[usize], dst: &mut [usize], rng: &mut R) -> MoveKind {
    let (x, y) = sample_cut(src.len(), rng);
    let kind = MoveKind::choose(rng);
    kind.apply(src, dst, x, y);
    debug_assert!(is_permutation(dst), "{kind:?} broke the tour");
    kind
}

#[inline]
fn check_cut(src: &[usize], dst: &[usize], x: usize, y: usize) {
    debug_assert_eq!(src.len(), dst.len());
    debug_assert!(x >= 1 && x + 2 <= y && y <= src.len(), "bad cut ({x}, {y})");
}

/// Reverses `[x, y)`.
pub fn two_opt(src: &[usize], dst: &mut [usize], x: usize, y: usize) {
    check_cut(src, dst, x, y);
    dst[..x].copy_from_slice(&src[..x]);
    for (d, s) in dst[x..y].iter_mut().zip(src[x..y].iter().rev()) {
        *d = *s;
    }
    dst[y..].copy_from_slice(&src[y..]);
}

/// Moves the element at `y-1` to `x`, shifting `[x, y-1)` right by one.
pub fn translate(src: &[usize], dst: &mut [usize], x: usize, y: usize) {
    check_cut(src, dst, x, y);
    dst[..x].copy_from_slice(&src[..x]);
    dst[x] = src[y - 1];
    dst[x + 1..y].copy_from_slice(&src[x..y - 1]);
    dst[y..].copy_from_slice(&src[y..]);
}

/// Exchanges the elements at `x` and `y-1`; the interior keeps its order.
pub fn switching(src: &[usize], dst: &mut [usize], x: usize, y: usize) {
    check_cut(src, dst, x, y);
    dst.copy_from_slice(src);
    dst.swap(x, y - 1);
}

/// Whether `tour` contains every id in `0..tour.len()` exactly once.
pub fn is_permutation(tour: &[usize]) -> bool {
    let mut seen = vec![false; tour.len()];
    for &node in tour {
        match seen.get_mut(node) {
            Some(flag) if !*flag => *flag = true,
            _ => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use std::collections::HashSet;

    const SRC: [usize; 7] = [0, 1, 2, 3, 4, 5, 6];

    #[test]
    fn test_two_opt() {
        let mut dst = [0; 7];
        two_opt(&SRC, &mut dst, 2, 6);
        assert_eq!(dst, [0, 1, 5, 4, 3, 2, 6]);
    }

    #[test]
    fn test_translate() {
        let mut dst = [0; 7];
        translate(&SRC, &mut dst, 2, 6);
        assert_eq!(dst, [0, 1, 5, 2, 3, 4, 6]);
    }

    #[test]
    fn test_switching() {
        let mut dst = [0; 7];
        switching(&SRC, &mut dst, 2, 6);
        assert_eq!(dst, [0, 1, 5, 3, 4, 2, 6]);
    }

    #[test]
    fn test_cut_reaching_the_end() {
        let mut dst = [0; 7];
        two_opt(&SRC, &mut dst, 1, 7);
        assert_eq!(dst, [0, 6, 5, 4, 3, 2, 1]);
        translate(&SRC, &mut dst, 5, 7);
        assert_eq!(dst, [0, 1, 2, 3, 4, 6, 5]);
    }

    #[test]
    fn test_sample_cut_bounds() {
        let mut rng = create_rng(5);
        for n in MIN_NODES..20 {
            for _ in 0..200 {
                let (x, y) = sample_cut(n, &mut rng);
                assert!(x >= 1);
                assert!(y >= x + 2);
                assert!(y <= n);
            }
        }
    }

    #[test]
    fn test_perturb_never_moves_first_node() {
        let mut rng = create_rng(9);
        let src: Vec<usize> = vec![3, 0, 5, 1, 4, 2];
        let mut dst = vec![0; src.len()];
        for _ in 0..500 {
            perturb(&src, &mut dst, &mut rng);
            assert_eq!(dst[0], 3);
            assert!(is_permutation(&dst));
        }
    }

    #[test]
    fn test_four_nodes_reach_every_cycle() {
        // With 4 nodes there are 3 distinct cycles through node 0; all of
        // them must be reachable in one move from the identity tour.
        let mut rng = create_rng(1);
        let src = [0, 1, 2, 3];
        let mut dst = [0; 4];
        let mut seen = HashSet::new();
        for _ in 0..500 {
            perturb(&src, &mut dst, &mut rng);
            let canonical = if dst[1] < dst[3] {
                dst
            } else {
                [dst[0], dst[3], dst[2], dst[1]]
            };
            seen.insert(canonical);
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_choose_follows_policy() {
        let mut rng = create_rng(123);
        let draws = 20_000;
        let mut counts = [0usize; 3];
        for _ in 0..draws {
            match MoveKind::choose(&mut rng) {
                MoveKind::TwoOpt => counts[0] += 1,
                MoveKind::Translate => counts[1] += 1,
                MoveKind::Switching => counts[2] += 1,
            }
        }
        let share = |c: usize| c as f64 / draws as f64;
        assert!((share(counts[0]) - 0.4).abs() < 0.02);
        assert!((share(counts[1]) - 0.4).abs() < 0.02);
        assert!((share(counts[2]) - 0.2).abs() < 0.02);
    }

    #[test]
    fn test_is_permutation() {
        assert!(is_permutation(&[]));
        assert!(is_permutation(&[2, 0, 1]));
        assert!(!is_permutation(&[0, 0, 1]));
        assert!(!is_permutation(&[0, 3, 1]));
    }
}
