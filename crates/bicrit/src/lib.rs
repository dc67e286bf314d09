//! Bicriteria branch-and-bound core: cell buffering and front maintenance.
//!
//! The crate does not own a solver loop. A driver pops cells from the
//! `buffer::StagedCellBuffer`, contracts and bisects them, feeds solutions to
//! `front::NonDominatedSet` and processed cells to `front::LowerFrontier`, and
//! reads the hypervolume gap off `front::FrontMetrics`.
//!
//! API Policy
//! - Breaking changes are allowed when they improve the design.
//! - `api` is the curated surface; `prelude` covers the common driver imports.

pub mod api;
pub mod buffer;
pub mod cell;
pub mod error;
pub mod front;
pub mod geom;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use nalgebra::Vector2 as Vec2;

/// Common exports for a driver loop.
pub mod prelude {
    pub use crate::buffer::{BufferCfg, SelectionPolicy, StagedCellBuffer};
    pub use crate::cell::{BoxCell, Cell, LbCut, ObjBox};
    pub use crate::error::BufferError;
    pub use crate::front::{FrontMetrics, IncumbentSet, LowerFrontier, NonDominatedSet};
    pub use crate::geom::{Interval, Pt2};
    pub use nalgebra::Vector2 as Vec2;
}
