//! Error types for the front core.

use thiserror::Error;

/// Failures of the staged cell buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BufferError {
    /// `pop` found every tier empty: the search space is exhausted.
    #[error("cell buffer is empty")]
    Empty,
}

/// Two segments have no common point (recoverable; callers keep the looser bound).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("segments do not intersect")]
pub struct NoIntersection;

/// Rejected configuration values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CfgError {
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
