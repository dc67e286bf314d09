//! Tolerance defaults for objective-space geometry (internal).
//!
//! Policy
//! - Fixed constants; the merge and distance routines take no tolerance
//!   arguments.

/// Half-width of the band around zero in which `r × s` marks two segments as parallel.
pub(crate) const PARALLEL_EPS: f64 = 1e-8;

/// Slack allowed by staircase validity checks for ulp-level wobble of rounded vertices.
pub(crate) const MONOTONE_TOL: f64 = 1e-9;
