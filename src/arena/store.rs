//! Arena storage, lifecycle and compaction.

use super::types::{ArenaId, Handle, Slot};
use crate::error::{AnnealError, Result};
use crate::matrix::DistanceMatrix;
use crate::moves;
use crate::sa::SolutionPool;
use rand::Rng;

/// Slot storage for the tours of one annealing pass.
///
/// An arena belongs to exactly one worker; it has no internal
/// synchronization and is never shared between threads.
///
/// # Examples
///
/// ```
/// use u_tsp_anneal::{DistanceMatrix, SolutionArena};
///
/// let m = DistanceMatrix::from_fn(4, |i, j| (i as f64 - j as f64).abs());
/// let mut arena = SolutionArena::new(&m, 8, true).unwrap();
///
/// let h = arena.insert(&[0, 1, 2, 3], None);
/// assert_eq!(arena.fitness(h), 6.0);
///
/// arena.destroy(h);
/// assert!(!arena.is_live(h));
/// let reused = arena.create();
/// assert_eq!(reused.slot(), h.slot());
/// ```
#[derive(Debug)]
pub struct SolutionArena<'m> {
    id: ArenaId,
    matrix: &'m DistanceMatrix,
    slots: Vec<Slot>,
    free: Vec<usize>,
    next_generation: u64,
    prune_size: usize,
    prefer_recent: bool,
}

impl<'m> SolutionArena<'m> {
    /// Creates an empty arena for tours over `matrix`.
    ///
    /// `prune_size` bounds the number of slots kept by [`compact`]
    /// (`retain`); it must be at least 2 so the best and current tours fit.
    /// The matrix needs at least [`MIN_NODES`](moves::MIN_NODES) nodes for
    /// [`neighbor`](SolutionArena::neighbor) to have a move to make.
    ///
    /// [`compact`]: SolutionArena::compact
    pub fn new(matrix: &'m DistanceMatrix, prune_size: usize, prefer_recent: bool) -> Result<Self> {
        if matrix.size() < moves::MIN_NODES {
            return Err(AnnealError::Config(format!(
                "tours need at least {} nodes, got {}",
                moves::MIN_NODES,
                matrix.size()
            )));
        }
        if prune_size < 2 {
            return Err(AnnealError::Config(format!(
                "prune_size must be at least 2, got {prune_size}"
            )));
        }
        Ok(Self {
            id: ArenaId::next(),
            matrix,
            slots: Vec::with_capacity(prune_size),
            free: Vec::new(),
            next_generation: 0,
            prune_size,
            prefer_recent,
        })
    }

    pub fn id(&self) -> ArenaId {
        self.id
    }

    /// Number of nodes per tour.
    pub fn node_count(&self) -> usize {
        self.matrix.size()
    }

    /// Number of slots currently allocated (in use or free).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of reclaimed slots waiting for reuse.
    pub fn free_len(&self) -> usize {
        self.free.len()
    }

    /// Size of the feasible set: slots not on the free list.
    pub fn live_len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn prune_size(&self) -> usize {
        self.prune_size
    }

    fn stamp(&mut self) -> u64 {
        self.next_generation += 1;
        self.next_generation
    }

    /// Whether `handle` still refers to live content of this arena.
    pub fn is_live(&self, handle: Handle) -> bool {
        handle.arena == self.id
            && self
                .slots
                .get(handle.slot)
                .is_some_and(|s| s.generation == handle.generation)
    }

    /// Hands out a writable slot, reusing a free one before growing.
    ///
    /// The tour content is whatever the slot held before; overwrite all of
    /// it before reading. The cost cache starts empty.
    pub fn create(&mut self) -> Handle {
        let slot = match self.free.pop() {
            Some(slot) => slot,
            None => {
                self.slots.push(Slot::with_len(self.matrix.size()));
                self.slots.len() - 1
            }
        };
        let generation = self.stamp();
        let entry = &mut self.slots[slot];
        entry.generation = generation;
        entry.cost = None;
        Handle {
            arena: self.id,
            slot,
            generation,
        }
    }

    /// Returns the slot to the free list.
    ///
    /// The content is left in place; only the index is reclaimed. Using
    /// `handle` afterwards is a logic error.
    pub fn destroy(&mut self, handle: Handle) {
        debug_assert!(self.is_live(handle), "destroy of stale handle {handle:?}");
        let generation = self.stamp();
        self.slots[handle.slot].generation = generation;
        self.free.push(handle.slot);
    }

    /// Creates a slot holding a copy of `tour`.
    ///
    /// `cost`, when known, seeds the memo so the first
    /// [`fitness`](SolutionArena::fitness) call is O(1).
    pub fn insert(&mut self, tour: &[usize], cost: Option<f64>) -> Handle {
        debug_assert_eq!(tour.len(), self.matrix.size());
        let handle = self.create();
        let entry = &mut self.slots[handle.slot];
        entry.tour.copy_from_slice(tour);
        entry.cost = cost;
        handle
    }

    pub fn tour(&self, handle: Handle) -> &[usize] {
        debug_assert!(self.is_live(handle), "read through stale handle {handle:?}");
        &self.slots[handle.slot].tour
    }

    /// Mutable access to the tour; drops the memoized cost.
    pub fn tour_mut(&mut self, handle: Handle) -> &mut [usize] {
        debug_assert!(self.is_live(handle), "write through stale handle {handle:?}");
        let entry = &mut self.slots[handle.slot];
        entry.cost = None;
        &mut entry.tour
    }

    /// Memoized cost, if it has been computed since the last repopulation.
    pub fn cached_cost(&self, handle: Handle) -> Option<f64> {
        debug_assert!(self.is_live(handle), "cached cost of stale handle {handle:?}");
        self.slots[handle.slot].cost
    }

    /// Cycle cost of the tour, computed once per population and memoized.
    pub fn fitness(&mut self, handle: Handle) -> f64 {
        debug_assert!(self.is_live(handle), "fitness of stale handle {handle:?}");
        let matrix = self.matrix;
        let entry = &mut self.slots[handle.slot];
        if let Some(cost) = entry.cost {
            return cost;
        }
        let cost = matrix.tour_cost(&entry.tour);
        entry.cost = Some(cost);
        cost
    }

    /// Writes a random neighbour of `handle`'s tour into a new slot.
    pub fn neighbor<R: Rng>(&mut self, handle: Handle, rng: &mut R) -> Handle {
        debug_assert!(self.is_live(handle), "neighbor of stale handle {handle:?}");
        let target = self.create();
        let mut buffer = std::mem::take(&mut self.slots[target.slot].tour);
        moves::perturb(&self.slots[handle.slot].tour, &mut buffer, rng);
        self.slots[target.slot].tour = buffer;
        target
    }

    /// Shrinks storage to at most `max(max_size, 2)` slots.
    ///
    /// `best` and `current` survive with tour and memoized cost intact and
    /// are remapped to slots 0 and 1 (both to slot 0 when they are the same
    /// handle). The remaining budget is filled with other slots, the most
    /// recently grown ones when `prefer_recent` is set and the oldest ones
    /// otherwise; all of them end up on the free list. Every handle other
    /// than the returned pair is stale afterwards.
    ///
    /// Nothing happens when storage already fits the budget.
    pub fn compact(
        &mut self,
        best: Handle,
        current: Handle,
        max_size: usize,
        prefer_recent: bool,
    ) -> (Handle, Handle) {
        let budget = max_size.max(2);
        if self.slots.len() <= budget {
            return (best, current);
        }
        debug_assert!(self.is_live(best), "compaction with stale best {best:?}");
        debug_assert!(
            self.is_live(current),
            "compaction with stale current {current:?}"
        );

        let mut anchors = vec![best.slot];
        if current.slot != best.slot {
            anchors.push(current.slot);
        }
        let keep = budget - anchors.len();

        let mut others: Vec<usize> = (0..self.slots.len())
            .filter(|i| !anchors.contains(i))
            .collect();
        if prefer_recent {
            // Ring-rotate the oldest entries past the cut so the newest survive.
            let dropped = others.len().saturating_sub(keep);
            others.rotate_left(dropped);
        }
        others.truncate(keep);

        let mut old = std::mem::take(&mut self.slots);
        let mut slots = Vec::with_capacity(budget);
        for &index in anchors.iter().chain(others.iter()) {
            let mut slot = std::mem::take(&mut old[index]);
            slot.generation = self.stamp();
            slots.push(slot);
        }
        self.slots = slots;
        self.free = (anchors.len()..self.slots.len()).collect();

        let new_best = Handle {
            arena: self.id,
            slot: 0,
            generation: self.slots[0].generation,
        };
        let new_current = if anchors.len() == 1 {
            new_best
        } else {
            Handle {
                arena: self.id,
                slot: 1,
                generation: self.slots[1].generation,
            }
        };
        (new_best, new_current)
    }
}

impl SolutionPool for SolutionArena<'_> {
    type Handle = Handle;

    fn fitness(&mut self, handle: Handle) -> f64 {
        SolutionArena::fitness(self, handle)
    }

    fn neighbor<R: Rng>(&mut self, handle: Handle, rng: &mut R) -> Handle {
        SolutionArena::neighbor(self, handle, rng)
    }

    fn release(&mut self, handle: Handle) {
        self.destroy(handle);
    }

    fn retain(&mut self, best: Handle, current: Handle) -> (Handle, Handle) {
        self.compact(best, current, self.prune_size, self.prefer_recent)
    }
}
