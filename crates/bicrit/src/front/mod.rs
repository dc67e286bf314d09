//! Front maintenance for two minimized objectives.
//!
//! Purpose
//! - `NonDominatedSet`: staircase of certified objective pairs and edges;
//!   answers dominance, distance and crowding queries for cell ordering.
//! - `LowerFrontier`: staircase polygon under everything the processed cells
//!   can still reach; a lower bound on the front.
//! - `IncumbentSet`: certified pairs with the decision boxes behind them.
//! - `FrontMetrics`: nadir tracking and hypervolume enclosures of the two
//!   bounds.
//!
//! Conventions
//! - Both structures are updated only by the driver, never by the buffer.
//! - Bounds are conservative: the non-dominated set never claims more than
//!   the solutions dominate, the lower frontier never claims less than the
//!   cells can reach.
//! - Code cross-refs: `geom::intersect`, `cell::Cell`, `buffer::StagedCellBuffer`

mod incumbent;
mod lower;
mod metrics;
mod nds;
mod staircase;

pub use incumbent::IncumbentSet;
pub use lower::LowerFrontier;
pub use metrics::{FrontMetrics, Nadir};
pub use nds::{NonDominatedSet, Vertex};

#[cfg(test)]
mod tests;
