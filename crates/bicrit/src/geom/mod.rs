//! Objective-space geometry with bound-aware coordinates.
//!
//! Purpose
//! - Provide the small numeric layer shared by the front structures: an
//!   outward-rounded `Interval`, interval pairs `Pt2`, and the conservative
//!   segment intersection used by the staircase merges.
//!
//! Conventions
//! - Both objectives are minimized; "dominated" means weakly worse in both.
//! - Ordered containers use the staircase order (`y1` ascending, `y2` descending).
//! - Code cross-refs: `front::{NonDominatedSet, LowerFrontier}`

mod cfg;
pub mod interval;
mod intersect;
mod types;

pub(crate) use cfg::MONOTONE_TOL;
pub use interval::Interval;
pub use intersect::intersect;
pub use types::{dominates, staircase_cmp, weakly_dominates, OrdPoint, Pt2};
