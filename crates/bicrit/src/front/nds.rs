//! Non-dominated set: the known part of the Pareto front as a staircase.
//!
//! Representation
//! - The boundary of the dominated region is stored as a polyline of
//!   `Vertex`es in staircase order (`y1` non-decreasing, `y2` non-increasing).
//!   Feasible vertices are certified objective pairs; the others are step
//!   corners and crossing points left behind by merges.
//! - Between vertices the boundary is linear; right of the last vertex it is a
//!   horizontal ray, left of the first vertex nothing is dominated.
//!
//! Inserting a point or an edge takes the lower envelope of the stored
//! boundary and the new one. Interior heights and crossing points are rounded
//! up, so the stored boundary never claims more than the inserted solutions
//! dominate, and distances computed against it are never too small.

use std::cmp::Ordering;

use nalgebra::Vector2;
use tracing::{trace, warn};

use super::staircase::{heights, is_monotone, lower_envelope, Rounding};
use crate::cell::Cell;
use crate::error::NoIntersection;
use crate::geom::{intersect, staircase_cmp, weakly_dominates, Interval, Pt2};

/// Boundary vertex of the dominated region.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    pub at: Vector2<f64>,
    /// Certified by a solution, as opposed to a corner or crossing.
    pub feasible: bool,
}

impl Vertex {
    #[inline]
    fn point(at: Vector2<f64>) -> Self {
        Self { at, feasible: true }
    }

    #[inline]
    fn corner(at: Vector2<f64>) -> Self {
        Self { at, feasible: false }
    }
}

#[inline]
fn at(v: &Vertex) -> Vector2<f64> {
    v.at
}

/// Segment-aware non-dominated set.
#[derive(Clone, Debug, Default)]
pub struct NonDominatedSet {
    verts: Vec<Vertex>,
}

impl NonDominatedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.verts.is_empty()
    }

    /// Number of certified points.
    pub fn len(&self) -> usize {
        self.verts.iter().filter(|v| v.feasible).count()
    }

    pub fn clear(&mut self) {
        self.verts.clear();
    }

    /// Full boundary polyline, corners included.
    pub fn vertices(&self) -> &[Vertex] {
        &self.verts
    }

    /// Certified points in staircase order; pairwise non-dominated.
    pub fn points(&self) -> impl Iterator<Item = Vector2<f64>> + '_ {
        self.verts.iter().filter(|v| v.feasible).map(|v| v.at)
    }

    /// Add a solution point; points it dominates leave the staircase.
    /// Returns whether the boundary changed.
    pub fn insert_point(&mut self, p: Vector2<f64>) -> bool {
        if !is_finite(p) {
            return false;
        }
        self.merge(&[Vertex::point(p)])
    }

    /// Add a certified edge of solutions between `p1` and `p2`.
    ///
    /// An edge that is not strictly descending reduces to the endpoint that
    /// dominates it.
    pub fn insert_segment(&mut self, p1: Vector2<f64>, p2: Vector2<f64>) -> bool {
        if !is_finite(p1) || !is_finite(p2) {
            return false;
        }
        let (a, b) = match staircase_cmp(p1, p2) {
            Ordering::Greater => (p2, p1),
            _ => (p1, p2),
        };
        if weakly_dominates(a, b) {
            return self.insert_point(a);
        }
        if a.x == b.x {
            return self.insert_point(b);
        }
        self.merge(&[Vertex::point(a), Vertex::point(b)])
    }

    /// Weak dominance: a point on the boundary counts as dominated.
    pub fn is_dominated(&self, y: Vector2<f64>) -> bool {
        let (_, bottom) = heights(&self.verts, at, y.x, Rounding::Up);
        y.y >= bottom
    }

    /// Signed diagonal distance from `q` to the boundary: the smallest `t`
    /// such that `q + (t, t)` is dominated. Non-positive iff `q` is
    /// dominated, `+inf` on an empty set. Rounded up.
    ///
    /// The diagonal through `q` meets the boundary on the edge where the
    /// vertex coordinate `y1 - y2` passes `q.y1 - q.y2`; that edge and its
    /// neighbours are the only candidates.
    pub fn distance_point(&self, q: Vector2<f64>) -> f64 {
        if self.verts.is_empty() {
            return f64::INFINITY;
        }
        let k = self.diagonal_rank(q.x - q.y);
        let window = &self.verts[k.saturating_sub(2)..(k + 2).min(self.verts.len())];
        let mut best = f64::INFINITY;
        for v in window {
            best = best.min(entry_time(v.at, q));
        }
        for w in window.windows(2) {
            best = best.min(edge_entry(w[0].at, w[1].at, q));
        }
        best
    }

    /// Largest diagonal distance over the points of segment `ya-yb`.
    ///
    /// Along the segment the distance is piecewise linear with breaks where
    /// the diagonal through a boundary vertex meets the segment, so the
    /// endpoints and the vertices whose diagonal falls strictly inside suffice.
    pub fn distance_segment(&self, ya: Vector2<f64>, yb: Vector2<f64>) -> f64 {
        if self.verts.is_empty() {
            return f64::INFINITY;
        }
        let d = yb - ya;
        let denom = d.x - d.y;
        let mut best = self.distance_point(ya).max(self.distance_point(yb));
        if denom > 0.0 {
            let (da, db) = (ya.x - ya.y, yb.x - yb.y);
            let hi = self.verts.partition_point(|v| v.at.x - v.at.y <= db);
            let lo = self.diagonal_rank(da).min(hi);
            for v in &self.verts[lo..hi] {
                let s = ((v.at.x - v.at.y) - da) / denom;
                if s > 0.0 && s < 1.0 {
                    best = best.max(self.distance_point(ya + d * s));
                }
            }
        }
        best
    }

    /// Distance of a cell to the front, an upper bound on how much it can
    /// still improve it. Uses the cell's cut segment when it has one, its
    /// lower corner otherwise.
    pub fn distance<C: Cell + ?Sized>(&self, cell: &C) -> f64 {
        let (a, b) = cell.lower_segment();
        if a == b {
            self.distance_point(a)
        } else {
            self.distance_segment(a, b)
        }
    }

    /// Spacing of the certified points bracketing `q`:
    /// `(next.y1 - prev.y1) + (prev.y2 - next.y2)`, infinite at the ends.
    pub fn crowding(&self, q: Vector2<f64>) -> f64 {
        let i = self.verts.partition_point(|v| v.at.x <= q.x);
        let prev = self.verts[..i].iter().rev().find(|v| v.feasible);
        let next = self.verts[i..].iter().find(|v| v.feasible);
        match (prev, next) {
            (Some(p), Some(n)) => (n.at.x - p.at.x) + (p.at.y - n.at.y),
            _ => f64::INFINITY,
        }
    }

    /// Certified points that `lb` does not weakly dominate, in staircase order.
    ///
    /// With `cutting_points`, the places where the boundary crosses the
    /// border of the cone above `lb` are added: its height at `y1 = lb.y1`
    /// and its abscissa at `y2 = lb.y2`, both rounded up.
    pub fn non_dominated_points(&self, lb: Vector2<f64>, cutting_points: bool) -> Vec<Vector2<f64>> {
        let mut out: Vec<Vector2<f64>> = self.points().filter(|p| !weakly_dominates(lb, *p)).collect();
        if cutting_points {
            let (_, h) = heights(&self.verts, at, lb.x, Rounding::Up);
            if h.is_finite() && h >= lb.y {
                out.push(Vector2::new(lb.x, h));
            }
            if let Some(x) = self.abscissa_at(lb.y).filter(|x| *x >= lb.x) {
                out.push(Vector2::new(x, lb.y));
            }
            out.sort_by(|a, b| staircase_cmp(*a, *b));
            out.dedup();
        }
        out
    }

    /// Crossing of `p0-p1` with `p2-p3`, rounded up in both coordinates so the
    /// result is dominated by the exact crossing.
    pub fn point_intersection(
        p0: Vector2<f64>,
        p1: Vector2<f64>,
        p2: Vector2<f64>,
        p3: Vector2<f64>,
    ) -> Result<Vector2<f64>, NoIntersection> {
        intersect(p0.into(), p1.into(), p2.into(), p3.into())
            .map(|s: Pt2| s.upper())
            .ok_or(NoIntersection)
    }

    /// Monotone polyline with pairwise non-dominated certified points.
    pub fn is_staircase(&self) -> bool {
        let pts: Vec<Vector2<f64>> = self.points().collect();
        is_monotone(self.verts.iter().map(|v| v.at))
            && pts.windows(2).all(|w| w[0].x < w[1].x && w[0].y > w[1].y)
    }

    /// Vertices whose diagonal coordinate `y1 - y2` is below `d`; the
    /// coordinate is non-decreasing along the staircase.
    fn diagonal_rank(&self, d: f64) -> usize {
        self.verts.partition_point(|v| v.at.x - v.at.y < d)
    }

    /// Leftmost abscissa where the boundary is at or below `y`, rounded up.
    fn abscissa_at(&self, y: f64) -> Option<f64> {
        let i = self.verts.partition_point(|v| v.at.y > y);
        let v = self.verts.get(i)?.at;
        let Some(u) = i.checked_sub(1).map(|k| self.verts[k].at) else {
            return Some(v.x);
        };
        let (ux, uy) = (Interval::point(u.x), Interval::point(u.y));
        let x = ux + (Interval::point(y) - uy) * (Interval::point(v.x) - ux) / (Interval::point(v.y) - uy);
        Some(x.ub().clamp(u.x, v.x))
    }

    fn merge(&mut self, incoming: &[Vertex]) -> bool {
        let merged = envelope(&self.verts, incoming);
        if merged == self.verts {
            return false;
        }
        if !is_monotone(merged.iter().map(|v| v.at)) {
            warn!(vertices = merged.len(), "nds merge skipped: envelope lost monotonicity");
            return false;
        }
        trace!(before = self.verts.len(), after = merged.len(), "nds merge");
        self.verts = merged;
        true
    }
}

#[inline]
fn is_finite(p: Vector2<f64>) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

/// `max(b.x - q.x, b.y - q.y)`, rounded up.
fn entry_time(b: Vector2<f64>, q: Vector2<f64>) -> f64 {
    let dx = Interval::point(b.x) - Interval::point(q.x);
    let dy = Interval::point(b.y) - Interval::point(q.y);
    dx.max(dy).ub()
}

/// Entry time of `q` through the points of edge `u-v`.
fn edge_entry(u: Vector2<f64>, v: Vector2<f64>, q: Vector2<f64>) -> f64 {
    let d = v - u;
    let denom = d.x - d.y;
    if !(denom > 0.0) {
        return f64::INFINITY;
    }
    let s = (((u.y - q.y) - (u.x - q.x)) / denom).clamp(0.0, 1.0);
    let s = Interval::point(s);
    let (ux, uy) = (Interval::point(u.x), Interval::point(u.y));
    let ex = (ux - Interval::point(q.x)) + s * (Interval::point(v.x) - ux);
    let ey = (uy - Interval::point(q.y)) + s * (Interval::point(v.y) - uy);
    ex.max(ey).ub()
}

/// Lower envelope of two staircase polylines; crossings become corners.
fn envelope(a: &[Vertex], b: &[Vertex]) -> Vec<Vertex> {
    let raw = lower_envelope(a, b, at, Rounding::Up)
        .into_iter()
        .map(|p| {
            if p.crossing {
                Vertex::corner(p.at)
            } else {
                vertex_at(a, b, p.at)
            }
        })
        .collect();
    tidy(raw)
}

/// Vertex at `p`, certified if either source certifies that exact location.
fn vertex_at(a: &[Vertex], b: &[Vertex], p: Vector2<f64>) -> Vertex {
    let certified = |poly: &[Vertex]| {
        let i = poly.partition_point(|v| v.at.x < p.x);
        poly[i..]
            .iter()
            .take_while(|v| v.at.x == p.x)
            .any(|v| v.feasible && v.at.y == p.y)
    };
    Vertex {
        at: p,
        feasible: certified(a) || certified(b),
    }
}

/// Normalize a raw envelope: monotone heights, no duplicates, certified
/// points only where they are not dominated, no redundant corners.
fn tidy(raw: Vec<Vertex>) -> Vec<Vertex> {
    let mut verts: Vec<Vertex> = Vec::with_capacity(raw.len());
    for mut v in raw {
        if let Some(prev) = verts.last_mut() {
            // the true boundary is non-increasing, so prev.y still bounds it from above
            v.at.y = v.at.y.min(prev.at.y);
            if prev.at == v.at {
                prev.feasible |= v.feasible;
                continue;
            }
        }
        verts.push(v);
    }

    // a certified point needs a strict drop before it and a strict step after it
    let n = verts.len();
    for i in 0..n {
        if verts[i].feasible {
            let drop_before = i == 0 || verts[i - 1].at.y > verts[i].at.y;
            let step_after = i + 1 == n || verts[i + 1].at.x > verts[i].at.x;
            verts[i].feasible = drop_before && step_after;
        }
    }

    let mut out: Vec<Vertex> = Vec::with_capacity(n);
    for v in verts {
        while let [.., u, m] = out.as_slice() {
            let vertical = u.at.x == m.at.x && m.at.x == v.at.x;
            let horizontal = u.at.y == m.at.y && m.at.y == v.at.y;
            if !m.feasible && (vertical || horizontal) {
                out.pop();
            } else {
                break;
            }
        }
        out.push(v);
    }

    // corner above the first drop, corner on the final ray
    while out.len() >= 2 && !out[0].feasible && out[1].at.x == out[0].at.x {
        out.remove(0);
    }
    while let [.., u, m] = out.as_slice() {
        if !m.feasible && u.at.y == m.at.y {
            out.pop();
        } else {
            break;
        }
    }
    out
}
