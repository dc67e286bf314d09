//! Cells: boxes of the extended search space as seen by the front core.
//!
//! The core reads only the objective part of a cell (`ObjBox`), an optional
//! oblique lower cut, and a cached priority bound it may tighten. Everything
//! else (contraction, bisection) belongs to the caller.
//!
//! Code cross-refs: `front::NonDominatedSet::distance`, `front::LowerFrontier::update_with_cell`,
//! `buffer::StagedCellBuffer`

use nalgebra::Vector2;

use crate::geom::Interval;

/// Objective-space projection of a cell: `[y1.lb, y1.ub] x [y2.lb, y2.ub]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObjBox {
    pub y1: Interval,
    pub y2: Interval,
}

impl ObjBox {
    #[inline]
    pub fn new(y1: Interval, y2: Interval) -> Self {
        Self { y1, y2 }
    }

    /// Lower-left corner, the best objective pair the cell could reach.
    #[inline]
    pub fn lower(&self) -> Vector2<f64> {
        Vector2::new(self.y1.lb(), self.y2.lb())
    }

    #[inline]
    pub fn upper(&self) -> Vector2<f64> {
        Vector2::new(self.y1.ub(), self.y2.ub())
    }
}

/// Oblique lower cut `y1 + a*y2 >= w_lb` satisfied by every feasible
/// objective pair of the cell (`a > 0`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LbCut {
    pub a: f64,
    pub w_lb: f64,
}

impl LbCut {
    /// Part of the cut line lying inside `obj`, as `(upper-left, lower-right)`
    /// endpoints rounded down. `None` when the cut does not pass above the
    /// lower corner (the corner is then the tighter bound) or misses the box.
    pub fn clip(&self, obj: &ObjBox) -> Option<(Vector2<f64>, Vector2<f64>)> {
        if !(self.a > 0.0) || !self.a.is_finite() || !self.w_lb.is_finite() {
            return None;
        }
        let a = Interval::point(self.a);
        let w = Interval::point(self.w_lb);
        let (l1, u1) = (obj.y1.lb(), obj.y1.ub());
        let (l2, u2) = (obj.y2.lb(), obj.y2.ub());

        // y2 where the line meets y1 = l1
        let ya2 = (w - Interval::point(l1)) / a;
        let start = if ya2.mid() > l2 && ya2.mid() < u2 {
            Vector2::new(l1, ya2.lb())
        } else if ya2.mid() >= u2 {
            let ya1 = w - a * Interval::point(u2);
            if ya1.mid() >= u1 {
                return None;
            }
            Vector2::new(ya1.lb(), u2)
        } else {
            return None;
        };

        // y1 where the line meets y2 = l2
        let yb1 = w - a * Interval::point(l2);
        let end = if yb1.mid() > l1 && yb1.mid() < u1 {
            Vector2::new(yb1.lb(), l2)
        } else {
            let yb2 = (w - Interval::point(u1)) / a;
            Vector2::new(u1, yb2.lb().max(l2))
        };
        Some((start, end))
    }
}

/// What the buffer and the front structures need from a cell.
pub trait Cell {
    /// Cached upper bound on the cell's distance to the front.
    fn priority_bound(&self) -> f64;

    fn set_priority_bound(&mut self, bound: f64);

    fn objectives(&self) -> ObjBox;

    fn lb_cut(&self) -> Option<LbCut> {
        None
    }

    /// Lower bounding segment of the cell's reachable objective region;
    /// degenerates to the lower corner when there is no active cut.
    fn lower_segment(&self) -> (Vector2<f64>, Vector2<f64>) {
        let obj = self.objectives();
        self.lb_cut()
            .and_then(|cut| cut.clip(&obj))
            .unwrap_or_else(|| (obj.lower(), obj.lower()))
    }
}

/// Plain cell: decision box, objective box, optional cut.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxCell {
    pub x: Vec<Interval>,
    pub y: ObjBox,
    pub cut: Option<LbCut>,
    pub priority_bound: f64,
    pub depth: u32,
}

impl BoxCell {
    pub fn new(x: Vec<Interval>, y: ObjBox) -> Self {
        Self {
            x,
            y,
            cut: None,
            priority_bound: f64::INFINITY,
            depth: 0,
        }
    }

    /// Cell with only an objective box; handy for drivers that keep the
    /// decision part elsewhere.
    pub fn from_objectives(y1: Interval, y2: Interval) -> Self {
        Self::new(Vec::new(), ObjBox::new(y1, y2))
    }

    pub fn with_cut(mut self, cut: LbCut) -> Self {
        self.cut = Some(cut);
        self
    }

    pub fn with_priority_bound(mut self, bound: f64) -> Self {
        self.priority_bound = bound;
        self
    }
}

impl Cell for BoxCell {
    #[inline]
    fn priority_bound(&self) -> f64 {
        self.priority_bound
    }

    #[inline]
    fn set_priority_bound(&mut self, bound: f64) {
        self.priority_bound = bound;
    }

    #[inline]
    fn objectives(&self) -> ObjBox {
        self.y
    }

    #[inline]
    fn lb_cut(&self) -> Option<LbCut> {
        self.cut
    }
}
