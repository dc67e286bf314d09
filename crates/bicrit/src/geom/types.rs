//! Objective-space points.
//!
//! - `Pt2`: pair of intervals `(y1, y2)`, the corner type of the lower frontier.
//! - `OrdPoint`: plain `Vector2<f64>` with the staircase order, usable as a map key.
//! - `dominates`/`weakly_dominates`: Pareto relations for minimization.
//!
//! Staircase order: `y1` ascending, ties by `y2` descending.

use std::cmp::Ordering;
use std::ops::{Add, Sub};

use nalgebra::Vector2;

use super::interval::Interval;

/// Objective pair with bound-aware coordinates.
#[derive(Clone, Copy, Debug)]
pub struct Pt2 {
    pub y1: Interval,
    pub y2: Interval,
}

impl Pt2 {
    #[inline]
    pub fn new(y1: f64, y2: f64) -> Self {
        Self {
            y1: Interval::point(y1),
            y2: Interval::point(y2),
        }
    }

    #[inline]
    pub fn from_intervals(y1: Interval, y2: Interval) -> Self {
        Self { y1, y2 }
    }

    #[inline]
    pub fn mid(&self) -> Vector2<f64> {
        Vector2::new(self.y1.mid(), self.y2.mid())
    }

    /// Lower-left corner of the enclosure; the conservative end for lower bounds.
    #[inline]
    pub fn lower(&self) -> Vector2<f64> {
        Vector2::new(self.y1.lb(), self.y2.lb())
    }

    /// Upper-right corner of the enclosure.
    #[inline]
    pub fn upper(&self) -> Vector2<f64> {
        Vector2::new(self.y1.ub(), self.y2.ub())
    }

    /// Planar cross product `self.y1 * o.y2 - self.y2 * o.y1`.
    #[inline]
    pub fn cross(&self, o: &Pt2) -> Interval {
        self.y1 * o.y2 - self.y2 * o.y1
    }

    #[inline]
    pub fn scale(&self, t: Interval) -> Pt2 {
        Pt2 {
            y1: self.y1 * t,
            y2: self.y2 * t,
        }
    }
}

impl From<Vector2<f64>> for Pt2 {
    #[inline]
    fn from(v: Vector2<f64>) -> Self {
        Pt2::new(v.x, v.y)
    }
}

impl Add for Pt2 {
    type Output = Pt2;
    #[inline]
    fn add(self, rhs: Pt2) -> Pt2 {
        Pt2 {
            y1: self.y1 + rhs.y1,
            y2: self.y2 + rhs.y2,
        }
    }
}

impl Sub for Pt2 {
    type Output = Pt2;
    #[inline]
    fn sub(self, rhs: Pt2) -> Pt2 {
        Pt2 {
            y1: self.y1 - rhs.y1,
            y2: self.y2 - rhs.y2,
        }
    }
}

impl PartialEq for Pt2 {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Pt2 {}

impl PartialOrd for Pt2 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Staircase order on midpoints.
impl Ord for Pt2 {
    fn cmp(&self, other: &Self) -> Ordering {
        staircase_cmp(self.mid(), other.mid())
    }
}

/// Plain objective point with the staircase order.
#[derive(Clone, Copy, Debug)]
pub struct OrdPoint(pub Vector2<f64>);

impl PartialEq for OrdPoint {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OrdPoint {}

impl PartialOrd for OrdPoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrdPoint {
    fn cmp(&self, other: &Self) -> Ordering {
        staircase_cmp(self.0, other.0)
    }
}

#[inline]
pub fn staircase_cmp(a: Vector2<f64>, b: Vector2<f64>) -> Ordering {
    a.x.total_cmp(&b.x).then_with(|| b.y.total_cmp(&a.y))
}

/// `a` dominates `b`: no worse in both objectives, strictly better in one.
#[inline]
pub fn dominates(a: Vector2<f64>, b: Vector2<f64>) -> bool {
    weakly_dominates(a, b) && (a.x < b.x || a.y < b.y)
}

/// `a <= b` componentwise.
#[inline]
pub fn weakly_dominates(a: Vector2<f64>, b: Vector2<f64>) -> bool {
    a.x <= b.x && a.y <= b.y
}
