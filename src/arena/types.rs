//! Handle and slot types.

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ARENA_ID: AtomicU64 = AtomicU64::new(0);

/// Process-unique identity of an arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArenaId(u64);

impl ArenaId {
    pub(crate) fn next() -> Self {
        ArenaId(NEXT_ARENA_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Value reference to a tour stored in an arena slot.
///
/// Two handles are equal iff they name the same arena, slot and generation.
/// Handles are plain values: copying one does not copy the tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    pub(crate) arena: ArenaId,
    pub(crate) slot: usize,
    pub(crate) generation: u64,
}

impl Handle {
    /// Arena the handle belongs to.
    pub fn arena(&self) -> ArenaId {
        self.arena
    }

    /// Slot index inside the arena.
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// Generation stamp the slot carried when this handle was issued.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// One tour buffer and its memoized cycle cost.
#[derive(Debug, Clone, Default)]
pub(crate) struct Slot {
    pub(crate) tour: Vec<usize>,
    /// `None` until the cost is computed for the current content.
    pub(crate) cost: Option<f64>,
    pub(crate) generation: u64,
}

impl Slot {
    pub(crate) fn with_len(n: usize) -> Self {
        Self {
            tour: vec![0; n],
            cost: None,
            generation: 0,
        }
    }
}
