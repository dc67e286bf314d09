//! Front quality: nadir tracking and hypervolume enclosures.
//!
//! Conventions
//! - Hypervolumes are measured against the nadir `(y1_max, y2_max)` and only
//!   the part of objective space below and left of it counts.
//! - `hypervolume_lb` integrates the region above the lower frontier,
//!   `hypervolume_ub` the region dominated by the incumbents; the first
//!   encloses the second, their difference is the remaining gap.
//! - Results are `Interval`s accumulated with outward rounding; both walk
//!   their structure once in increasing `y1` order.

use nalgebra::Vector2;

use super::incumbent::IncumbentSet;
use super::lower::LowerFrontier;
use crate::cell::ObjBox;
use crate::geom::{Interval, Pt2};

const HALF: Interval = Interval::point(0.5);

/// Monotone reference point; starts at `-inf` in both coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Nadir {
    y1_max: f64,
    y2_max: f64,
}

impl Default for Nadir {
    fn default() -> Self {
        Self {
            y1_max: f64::NEG_INFINITY,
            y2_max: f64::NEG_INFINITY,
        }
    }
}

impl Nadir {
    /// Raise the coordinates that `y1`/`y2` exceed; never lowers.
    pub fn raise(&mut self, y1: Option<f64>, y2: Option<f64>) {
        if let Some(v) = y1 {
            self.y1_max = self.y1_max.max(v);
        }
        if let Some(v) = y2 {
            self.y2_max = self.y2_max.max(v);
        }
    }

    /// `None` until both coordinates were observed.
    pub fn get(&self) -> Option<Vector2<f64>> {
        (self.y1_max.is_finite() && self.y2_max.is_finite())
            .then(|| Vector2::new(self.y1_max, self.y2_max))
    }
}

/// Nadir bookkeeping plus the hypervolume integrals.
#[derive(Clone, Debug, Default)]
pub struct FrontMetrics {
    nadir: Nadir,
    y1_best: Option<Vector2<f64>>,
    y2_best: Option<Vector2<f64>>,
}

impl FrontMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nadir(&self) -> Option<Vector2<f64>> {
        self.nadir.get()
    }

    pub fn y1_best(&self) -> Option<Vector2<f64>> {
        self.y1_best
    }

    pub fn y2_best(&self) -> Option<Vector2<f64>> {
        self.y2_best
    }

    /// New incumbent: update the extremes, then pull the nadir up to
    /// `(y2_best.y1, y1_best.y2)`.
    pub fn observe_incumbent(&mut self, y: Vector2<f64>) {
        let better_y1 = |b: &Vector2<f64>| y.x < b.x || (y.x == b.x && y.y < b.y);
        let better_y2 = |b: &Vector2<f64>| y.y < b.y || (y.y == b.y && y.x < b.x);
        if self.y1_best.as_ref().map_or(true, better_y1) {
            self.y1_best = Some(y);
        }
        if self.y2_best.as_ref().map_or(true, better_y2) {
            self.y2_best = Some(y);
        }
        self.nadir
            .raise(self.y2_best.map(|p| p.x), self.y1_best.map(|p| p.y));
    }

    /// Processed cell: its box may still hold points beyond an extreme
    /// incumbent, in which case the nadir must cover its far corner.
    pub fn observe_cell(&mut self, obj: &ObjBox) {
        let y2_ref = self.y2_best.map_or(f64::INFINITY, |p| p.y);
        let y1_ref = self.y1_best.map_or(f64::INFINITY, |p| p.x);
        self.nadir.raise(
            (obj.y2.lb() < y2_ref).then(|| obj.y1.ub()),
            (obj.y1.lb() < y1_ref).then(|| obj.y2.ub()),
        );
    }

    /// Area above the lower frontier and below/left of the nadir.
    pub fn hypervolume_lb(&self, lb: &LowerFrontier) -> Interval {
        let Some(nadir) = self.nadir() else {
            return Interval::ZERO;
        };
        let (xm, ym) = (Interval::point(nadir.x), Interval::point(nadir.y));
        let pts: Vec<Pt2> = lb.points().map(Pt2::from).collect();
        let mut vol = Interval::ZERO;
        for w in pts.windows(2) {
            let (a, b) = (w[0], w[1]);
            if a.y1.mid() >= nadir.x {
                break;
            }
            let b = if b.y1.mid() > nadir.x { clip_at(a, b, xm) } else { b };
            vol += edge_area(a, b, ym);
        }
        vol
    }

    /// Area dominated by the incumbents, bounded by the nadir. The last
    /// incumbent's rectangle extends to `y1_max`.
    pub fn hypervolume_ub(&self, ub: &IncumbentSet) -> Interval {
        let Some(nadir) = self.nadir() else {
            return Interval::ZERO;
        };
        let pts: Vec<Vector2<f64>> = ub.points().take_while(|p| p.x < nadir.x).collect();
        let ym = Interval::point(nadir.y);
        let mut vol = Interval::ZERO;
        for (i, p) in pts.iter().enumerate() {
            if p.y >= nadir.y {
                continue;
            }
            let x_next = pts.get(i + 1).map_or(nadir.x, |q| q.x);
            vol += (Interval::point(x_next) - Interval::point(p.x)) * (ym - Interval::point(p.y));
        }
        vol
    }

    /// `hypervolume_lb - hypervolume_ub`; shrinks to zero as the front closes.
    pub fn gap(&self, lb: &LowerFrontier, ub: &IncumbentSet) -> Interval {
        self.hypervolume_lb(lb) - self.hypervolume_ub(ub)
    }
}

/// Point of edge `a-b` at `y1 = xm`.
fn clip_at(a: Pt2, b: Pt2, xm: Interval) -> Pt2 {
    let y = a.y2 + (xm - a.y1) * (b.y2 - a.y2) / (b.y1 - a.y1);
    Pt2::from_intervals(xm, y)
}

/// Area between edge `a-b` and the line `y2 = ym`, counting only the part
/// below `ym`.
fn edge_area(a: Pt2, b: Pt2, ym: Interval) -> Interval {
    let w = b.y1 - a.y1;
    let (ha, hb) = (ym - a.y2, ym - b.y2);
    match (ha.mid() > 0.0, hb.mid() > 0.0) {
        (true, true) => (ha + hb) * w * HALF,
        (false, false) => Interval::ZERO,
        (true, false) => triangle(ha, hb, w),
        (false, true) => triangle(hb, ha, w),
    }
}

/// Area of the positive part of a linear height going from `h_pos > 0` to
/// `h_neg <= 0` over width `w`.
fn triangle(h_pos: Interval, h_neg: Interval, w: Interval) -> Interval {
    let span = h_pos - h_neg;
    if span.lb() <= 0.0 {
        return (h_pos * w * HALF).hull(Interval::ZERO);
    }
    h_pos * h_pos / span * w * HALF
}
