//! Conservative segment intersection in objective space.
//!
//! Contract
//! - `Some(s)`: the segments meet and `s` encloses a point of both segments.
//! - `None`: no intersection, or the enclosure degenerated to an unbounded one.
//!
//! Case analysis follows the staircase walks that call it: axis-parallel pairs
//! (vertical against horizontal) are resolved exactly from the coordinates,
//! zero-length segments never intersect, near-parallel pairs are handled as
//! collinear overlap, and the general case solves `p + t r = q + u s` in
//! interval arithmetic.

use nalgebra::Vector2;

use super::cfg::PARALLEL_EPS;
use super::interval::Interval;
use super::types::Pt2;

/// Intersection of segment `p-p2` with segment `q-q2`.
pub fn intersect(p: Pt2, p2: Pt2, q: Pt2, q2: Pt2) -> Option<Pt2> {
    let (pm, p2m, qm, q2m) = (p.mid(), p2.mid(), q.mid(), q2.mid());

    // vertical p, horizontal q
    if pm.x == p2m.x && qm.y == q2m.y && pm != p2m && qm != q2m {
        return axis_cross(pm, p2m, qm, q2m).then_some(Pt2::from_intervals(p.y1, q.y2));
    }
    // horizontal p, vertical q
    if pm.y == p2m.y && qm.x == q2m.x && pm != p2m && qm != q2m {
        return axis_cross(qm, q2m, pm, p2m).then_some(Pt2::from_intervals(q.y1, p.y2));
    }

    if pm == p2m || qm == q2m {
        return None;
    }

    let r = p2 - p;
    let s = q2 - q;
    let rxs = r.cross(&s);
    let qp = q - p;

    if rxs.lb() > -PARALLEL_EPS && rxs.ub() < PARALLEL_EPS {
        let qpxr = qp.cross(&r);
        if qpxr.lb() > PARALLEL_EPS || qpxr.ub() < -PARALLEL_EPS {
            return None;
        }
        return collinear_overlap(pm, p2m, qm, q2m);
    }

    let t = qp.cross(&s) / rxs;
    let u = qp.cross(&r) / rxs;
    if t.ub() < 0.0 || t.lb() > 1.0 || u.ub() < 0.0 || u.lb() > 1.0 {
        return None;
    }
    let t = t.meet(Interval::UNIT)?;
    let res = p + r.scale(t);
    (res.y1.is_finite() && res.y2.is_finite()).then_some(res)
}

/// `v-v2` vertical, `h-h2` horizontal: do they cross (endpoints included)?
fn axis_cross(v: Vector2<f64>, v2: Vector2<f64>, h: Vector2<f64>, h2: Vector2<f64>) -> bool {
    let (hx_lo, hx_hi) = (h.x.min(h2.x), h.x.max(h2.x));
    let (vy_lo, vy_hi) = (v.y.min(v2.y), v.y.max(v2.y));
    (hx_lo..=hx_hi).contains(&v.x) && (vy_lo..=vy_hi).contains(&h.y)
}

/// Overlap of two collinear segments; returns the overlap end that comes
/// first in staircase order.
fn collinear_overlap(
    p: Vector2<f64>,
    p2: Vector2<f64>,
    q: Vector2<f64>,
    q2: Vector2<f64>,
) -> Option<Pt2> {
    let r = p2 - p;
    let rr = r.dot(&r);
    let t0 = (q - p).dot(&r) / rr;
    let t1 = (q2 - p).dot(&r) / rr;
    let lo = t0.min(t1).max(0.0);
    let hi = t0.max(t1).min(1.0);
    if lo > hi {
        return None;
    }
    let a = Pt2::from(p + r * lo);
    let b = Pt2::from(p + r * hi);
    Some(a.min(b))
}
