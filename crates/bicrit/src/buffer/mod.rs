//! Staged cell buffer: the order in which cells are expanded.
//!
//! Purpose
//! - Explore a short beam of freshly produced cells (the staging window)
//!   before falling back to a global best-first order, with the window
//!   bounded by `BufferCfg::capacity`.
//! - Keep cached distance bounds honest as the front improves: tightened on
//!   `push`, corrected lazily on the top of the global tier.
//!
//! Conventions
//! - Cells are moved in by `push` and moved out by `pop`; `flush` drops them.
//! - The buffer reads the non-dominated set but never updates it.
//! - Code cross-refs: `front::NonDominatedSet::{distance, crowding}`

mod cfg;
mod staged;

pub use cfg::{BufferCfg, SelectionPolicy};
pub use staged::{BufferStats, StagedCellBuffer};
