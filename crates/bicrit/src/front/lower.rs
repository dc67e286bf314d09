//! Lower frontier: staircase polygon under the reachable objective region of
//! the processed cells.
//!
//! The polygon is seeded lazily with the corners `(y1.lb, y2.ub)`,
//! `(y1.ub, y2.ub)`, `(y1.ub, y2.lb)` of the initial objective box, so its
//! first and last vertices never move. Each processed cell contributes its
//! lower segment (its lower corner, or the part of its oblique cut inside the
//! box). A merge replaces the boundary by the lower envelope of the old
//! boundary and the border of the new region
//!
//! ```text
//!   R = { y : y1 >= p1.y1, y2 >= p2.y2, y on or above the line p1-p2 }
//! ```
//!
//! Inputs enter at the lower corner of their enclosures and interior heights
//! and crossings are rounded down, so the stored boundary never rises above
//! the exact one. A merge whose result is not a staircase is skipped; the old
//! polygon is still a valid, looser bound.

use nalgebra::Vector2;
use tracing::{debug, trace, warn};

use super::staircase::{heights, is_monotone, lower_envelope, Rounding};
use crate::cell::Cell;
use crate::geom::{staircase_cmp, weakly_dominates, Interval, Pt2};

#[derive(Clone, Debug)]
pub struct LowerFrontier {
    y1_init: Interval,
    y2_init: Interval,
    pts: Vec<Vector2<f64>>,
}

impl LowerFrontier {
    /// Empty frontier over the initial objective ranges; seeded on first merge.
    pub fn new(y1_init: Interval, y2_init: Interval) -> Self {
        Self {
            y1_init,
            y2_init,
            pts: Vec::new(),
        }
    }

    pub fn bounds(&self) -> (Interval, Interval) {
        (self.y1_init, self.y2_init)
    }

    pub fn len(&self) -> usize {
        self.pts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pts.is_empty()
    }

    /// Drop every vertex; the next merge seeds again.
    pub fn clear(&mut self) {
        self.pts.clear();
    }

    /// Vertices in staircase order.
    pub fn points(&self) -> impl Iterator<Item = Vector2<f64>> + '_ {
        self.pts.iter().copied()
    }

    /// Merge the lower segment of a processed cell.
    pub fn update_with_cell<C: Cell + ?Sized>(&mut self, cell: &C) -> bool {
        let (a, b) = cell.lower_segment();
        self.insert_segment(Pt2::from(a), Pt2::from(b))
    }

    pub fn insert_point(&mut self, p: Pt2) -> bool {
        self.insert_segment(p, p)
    }

    /// Merge the bounding segment `p1-p2`. Returns whether the polygon changed.
    pub fn insert_segment(&mut self, p1: Pt2, p2: Pt2) -> bool {
        if !(finite(&p1) && finite(&p2)) {
            warn!("lower frontier merge skipped: unbounded segment");
            return false;
        }
        if self.pts.is_empty() {
            self.seed();
        }
        let (a, b) = normalize(self.clamp(p1.lower()), self.clamp(p2.lower()));
        let region = self.region(a, b);

        let raw: Vec<Vector2<f64>> = lower_envelope(&self.pts, &region, |v| *v, Rounding::Down)
            .into_iter()
            .map(|p| p.at)
            .collect();
        let merged = self.tidy(raw);
        if merged == self.pts {
            trace!(y1 = a.x, y2 = a.y, "lower frontier merge: no change");
            return false;
        }
        if !is_monotone(merged.iter().copied()) {
            warn!(y1 = a.x, y2 = a.y, vertices = merged.len(), "lower frontier merge skipped: envelope lost monotonicity");
            return false;
        }
        debug!(before = self.pts.len(), after = merged.len(), "lower frontier merge");
        self.pts = merged;
        true
    }

    /// Lowest boundary height at `y1`; `None` left of the polygon.
    pub fn boundary_at(&self, y1: f64) -> Option<f64> {
        let (_, right) = heights(&self.pts, |v| *v, y1, Rounding::Down);
        right.is_finite().then_some(right)
    }

    /// Monotone polyline from `(y1.lb, y2.ub)` to `(y1.ub, y2.lb)`.
    pub fn is_staircase(&self) -> bool {
        let (Some(first), Some(last)) = (self.pts.first(), self.pts.last()) else {
            return true;
        };
        *first == self.top_left() && *last == self.bottom_right() && is_monotone(self.points())
    }

    fn seed(&mut self) {
        let (l1, u1) = (self.y1_init.lb(), self.y1_init.ub());
        let (l2, u2) = (self.y2_init.lb(), self.y2_init.ub());
        self.pts = vec![Vector2::new(l1, u2), Vector2::new(u1, u2), Vector2::new(u1, l2)];
        debug!(y1_lb = l1, y1_ub = u1, y2_lb = l2, y2_ub = u2, "lower frontier seeded");
    }

    #[inline]
    fn top_left(&self) -> Vector2<f64> {
        Vector2::new(self.y1_init.lb(), self.y2_init.ub())
    }

    #[inline]
    fn bottom_right(&self) -> Vector2<f64> {
        Vector2::new(self.y1_init.ub(), self.y2_init.lb())
    }

    fn clamp(&self, p: Vector2<f64>) -> Vector2<f64> {
        Vector2::new(
            p.x.clamp(self.y1_init.lb(), self.y1_init.ub()),
            p.y.clamp(self.y2_init.lb(), self.y2_init.ub()),
        )
    }

    /// Border of `R` inside the box: up from `a`, along `a-b`, right from `b`.
    fn region(&self, a: Vector2<f64>, b: Vector2<f64>) -> Vec<Vector2<f64>> {
        let mut r = vec![
            Vector2::new(a.x, self.y2_init.ub()),
            a,
            b,
            Vector2::new(self.y1_init.ub(), b.y),
        ];
        r.dedup();
        r
    }

    /// Monotone heights, no duplicates, no redundant corners, box corners kept.
    fn tidy(&self, raw: Vec<Vector2<f64>>) -> Vec<Vector2<f64>> {
        let mut out: Vec<Vector2<f64>> = Vec::with_capacity(raw.len() + 1);
        for mut v in raw {
            if let Some(prev) = out.last() {
                v.y = v.y.min(prev.y);
                if *prev == v {
                    continue;
                }
            }
            while let [.., u, m] = out.as_slice() {
                let vertical = u.x == m.x && m.x == v.x;
                let horizontal = u.y == m.y && m.y == v.y;
                if vertical || horizontal {
                    out.pop();
                } else {
                    break;
                }
            }
            out.push(v);
        }
        let top_left = self.top_left();
        if out.first().is_some_and(|v| *v != top_left) {
            out.insert(0, top_left);
        }
        out
    }
}

fn finite(p: &Pt2) -> bool {
    p.y1.is_finite() && p.y2.is_finite()
}

/// Order the endpoints; a non-descending segment collapses to its dominating end.
fn normalize(p1: Vector2<f64>, p2: Vector2<f64>) -> (Vector2<f64>, Vector2<f64>) {
    let (a, b) = if staircase_cmp(p2, p1).is_lt() { (p2, p1) } else { (p1, p2) };
    if weakly_dominates(a, b) {
        (a, a)
    } else if a.x == b.x {
        (b, b)
    } else {
        (a, b)
    }
}
