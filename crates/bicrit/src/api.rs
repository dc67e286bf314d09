//! Curated API surface (unstable).
//!
//! Prefer these re-exports in drivers and benches; module paths may move.

// cells and buffering
pub use crate::buffer::{BufferCfg, BufferStats, SelectionPolicy, StagedCellBuffer};
pub use crate::cell::{BoxCell, Cell, LbCut, ObjBox};
// fronts and metrics
pub use crate::front::{FrontMetrics, IncumbentSet, LowerFrontier, Nadir, NonDominatedSet, Vertex};
// objective-space numerics
pub use crate::geom::{
    dominates, intersect, staircase_cmp, weakly_dominates, Interval, OrdPoint, Pt2,
};
// errors
pub use crate::error::{BufferError, CfgError, NoIntersection};
