//! Pooled tour storage.
//!
//! Annealing creates and discards a candidate tour on every step. Instead of
//! allocating a fresh `Vec` each time, candidates live in slots of a
//! [`SolutionArena`]: released slots go on a free list and are reused, and
//! periodic compaction keeps only the best and current tours so memory stays
//! bounded by the prune size rather than the number of iterations.
//!
//! Solutions are addressed by [`Handle`] values. A handle carries the slot's
//! generation stamp, so a handle kept past [`SolutionArena::destroy`] or past
//! a compaction is detectably stale instead of silently aliasing new content.

mod store;
mod types;

pub use store::SolutionArena;
pub use types::{ArenaId, Handle};
