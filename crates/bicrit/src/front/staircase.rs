//! Monotone polylines kept in staircase order (internal).
//!
//! Both front structures store the boundary of an up-right closed region as
//! a polyline with `y1` non-decreasing and `y2` non-increasing. Left of the
//! first vertex the region is empty, right of the last vertex the boundary
//! continues as a horizontal ray. The union of two such regions is bounded
//! by the pointwise minimum of their boundaries, computed by `lower_envelope`.

use nalgebra::Vector2;

use crate::geom::{intersect, Interval, Pt2, MONOTONE_TOL};

/// Which end of an enclosure interior points are placed at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Rounding {
    /// Never too low; the non-dominated set never claims too much.
    Up,
    /// Never too high; the lower frontier never claims too much.
    Down,
}

/// Boundary heights `(left, right)` at abscissa `x`.
///
/// `left` is the limit from the left (`+inf` at or before the first vertex),
/// `right` the value at `x` itself, which is the bottom of a vertical drop.
pub(crate) fn heights<T>(
    pts: &[T],
    at: impl Fn(&T) -> Vector2<f64>,
    x: f64,
    rounding: Rounding,
) -> (f64, f64) {
    let Some(last) = pts.last().map(&at) else {
        return (f64::INFINITY, f64::INFINITY);
    };
    let i = pts.partition_point(|p| at(p).x < x);
    if i == pts.len() {
        return (last.y, last.y);
    }
    let vi = at(&pts[i]);
    let right = if vi.x == x {
        let j = pts.partition_point(|p| at(p).x <= x);
        at(&pts[j - 1]).y
    } else if i == 0 {
        f64::INFINITY
    } else {
        lerp(at(&pts[i - 1]), vi, x, rounding)
    };
    let left = if i == 0 {
        f64::INFINITY
    } else if vi.x == x {
        vi.y
    } else {
        right
    };
    (left, right)
}

/// Height of edge `a-b` at `x`, for `a.x < x < b.x`; clamped to the edge's range.
fn lerp(a: Vector2<f64>, b: Vector2<f64>, x: f64, rounding: Rounding) -> f64 {
    let (ax, ay) = (Interval::point(a.x), Interval::point(a.y));
    let y = ay + (Interval::point(x) - ax) * (Interval::point(b.y) - ay) / (Interval::point(b.x) - ax);
    let v = match rounding {
        Rounding::Up => y.ub(),
        Rounding::Down => y.lb(),
    };
    v.clamp(a.y.min(b.y), a.y.max(b.y))
}

/// Envelope vertex; `crossing` marks a point where the two inputs swap.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Breakpoint {
    pub at: Vector2<f64>,
    pub crossing: bool,
}

/// Lower envelope of two staircase polylines, untidied.
///
/// Every vertex abscissa of either input is a breakpoint; between two
/// breakpoints both inputs are linear, so at most one crossing lies there.
/// Interior heights and crossings are rounded per `rounding`.
pub(crate) fn lower_envelope<T>(
    a: &[T],
    b: &[T],
    at: impl Fn(&T) -> Vector2<f64> + Copy,
    rounding: Rounding,
) -> Vec<Breakpoint> {
    let mut xs: Vec<f64> = a.iter().chain(b).map(|p| at(p).x).collect();
    xs.sort_by(f64::total_cmp);
    xs.dedup();

    let vertex = |x: f64, y: f64| Breakpoint {
        at: Vector2::new(x, y),
        crossing: false,
    };
    let mut out = Vec::with_capacity(xs.len() + 4);
    for (k, &x) in xs.iter().enumerate() {
        let (la, ra) = heights(a, at, x, rounding);
        let (lb, rb) = heights(b, at, x, rounding);
        let (left, right) = (la.min(lb), ra.min(rb));
        if left.is_finite() {
            out.push(vertex(x, left));
        }
        if right < left {
            out.push(vertex(x, right));
        }

        let Some(&nx) = xs.get(k + 1) else {
            continue;
        };
        let (na, _) = heights(a, at, nx, rounding);
        let (nb, _) = heights(b, at, nx, rounding);
        if let Some(c) = crossing((x, nx), (ra, rb), (na, nb), rounding) {
            out.push(Breakpoint {
                at: c,
                crossing: true,
            });
        }
    }
    out
}

/// Crossing of the two linear pieces over `(x0, x1)`.
///
/// `Up` keeps the upper corner of the enclosure and drops crossings that
/// round onto an end. `Down` keeps the lower corner, pulled back into the
/// interval; any point left-below the true crossing keeps the chords under
/// both pieces.
fn crossing(
    (x0, x1): (f64, f64),
    (a0, b0): (f64, f64),
    (a1, b1): (f64, f64),
    rounding: Rounding,
) -> Option<Vector2<f64>> {
    if ![a0, b0, a1, b1].iter().all(|v| v.is_finite()) {
        return None;
    }
    let (d0, d1) = (a0 - b0, a1 - b1);
    if !((d0 < 0.0 && d1 > 0.0) || (d0 > 0.0 && d1 < 0.0)) {
        return None;
    }
    let s = intersect(
        Pt2::new(x0, a0),
        Pt2::new(x1, a1),
        Pt2::new(x0, b0),
        Pt2::new(x1, b1),
    )?;
    match rounding {
        Rounding::Up => {
            let c = s.upper();
            (c.x > x0 && c.x < x1).then_some(c)
        }
        Rounding::Down => {
            let c = s.lower();
            let c = Vector2::new(c.x.max(x0), c.y.max(a1.min(b1)));
            (c.x < x1).then_some(c)
        }
    }
}

/// `y1` non-decreasing and `y2` non-increasing, up to ulp-level wobble.
pub(crate) fn is_monotone(pts: impl IntoIterator<Item = Vector2<f64>>) -> bool {
    let pts: Vec<Vector2<f64>> = pts.into_iter().collect();
    pts.windows(2).all(|w| {
        let (a, b) = (w[0], w[1]);
        b.x >= a.x - slack(a.x) && b.y <= a.y + slack(a.y)
    })
}

#[inline]
fn slack(v: f64) -> f64 {
    MONOTONE_TOL * (1.0 + v.abs())
}
