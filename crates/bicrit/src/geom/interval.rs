//! Closed intervals with outward rounding.
//!
//! Every arithmetic result is widened by one ulp on each side, so the exact
//! real result of the operation on any members of the operands is enclosed.
//! Infinite bounds are kept as they are.
//!
//! Code cross-refs: `types::Pt2`, `intersect::intersect`, `front::metrics`

use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

/// Closed interval `[lo, hi]` of reals.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Interval {
    lo: f64,
    hi: f64,
}

impl Interval {
    pub const ZERO: Self = Self { lo: 0.0, hi: 0.0 };
    pub const ENTIRE: Self = Self {
        lo: f64::NEG_INFINITY,
        hi: f64::INFINITY,
    };
    pub const UNIT: Self = Self { lo: 0.0, hi: 1.0 };

    #[inline]
    pub fn new(lo: f64, hi: f64) -> Self {
        debug_assert!(lo <= hi, "interval bounds out of order: [{lo}, {hi}]");
        Self { lo, hi }
    }

    /// Degenerate interval `[v, v]` (no widening).
    #[inline]
    pub const fn point(v: f64) -> Self {
        Self { lo: v, hi: v }
    }

    #[inline]
    pub fn lb(&self) -> f64 {
        self.lo
    }

    #[inline]
    pub fn ub(&self) -> f64 {
        self.hi
    }

    /// Midpoint; finite whenever one bound is finite.
    pub fn mid(&self) -> f64 {
        match (self.lo.is_finite(), self.hi.is_finite()) {
            (true, true) => 0.5 * self.lo + 0.5 * self.hi,
            (false, true) => self.hi,
            (true, false) => self.lo,
            (false, false) => 0.0,
        }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.hi - self.lo
    }

    #[inline]
    pub fn contains(&self, v: f64) -> bool {
        self.lo <= v && v <= self.hi
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.lo.is_finite() && self.hi.is_finite()
    }

    /// Smallest interval containing both.
    #[inline]
    pub fn hull(self, other: Self) -> Self {
        Self {
            lo: self.lo.min(other.lo),
            hi: self.hi.max(other.hi),
        }
    }

    /// Set intersection, `None` when disjoint.
    #[inline]
    pub fn meet(self, other: Self) -> Option<Self> {
        let lo = self.lo.max(other.lo);
        let hi = self.hi.min(other.hi);
        (lo <= hi).then_some(Self { lo, hi })
    }

    /// Enclosure of `{max(a, b)}` for `a` in self and `b` in other.
    #[inline]
    pub fn max(self, other: Self) -> Self {
        Self {
            lo: self.lo.max(other.lo),
            hi: self.hi.max(other.hi),
        }
    }

    /// Enclosure of `{min(a, b)}`.
    #[inline]
    pub fn min(self, other: Self) -> Self {
        Self {
            lo: self.lo.min(other.lo),
            hi: self.hi.min(other.hi),
        }
    }
}

impl From<f64> for Interval {
    #[inline]
    fn from(v: f64) -> Self {
        Self::point(v)
    }
}

impl Add for Interval {
    type Output = Interval;
    #[inline]
    fn add(self, rhs: Interval) -> Interval {
        Interval {
            lo: round_down(self.lo + rhs.lo),
            hi: round_up(self.hi + rhs.hi),
        }
    }
}

impl AddAssign for Interval {
    #[inline]
    fn add_assign(&mut self, rhs: Interval) {
        *self = *self + rhs;
    }
}

impl Sub for Interval {
    type Output = Interval;
    #[inline]
    fn sub(self, rhs: Interval) -> Interval {
        Interval {
            lo: round_down(self.lo - rhs.hi),
            hi: round_up(self.hi - rhs.lo),
        }
    }
}

impl Neg for Interval {
    type Output = Interval;
    #[inline]
    fn neg(self) -> Interval {
        Interval {
            lo: -self.hi,
            hi: -self.lo,
        }
    }
}

impl Mul for Interval {
    type Output = Interval;
    fn mul(self, rhs: Interval) -> Interval {
        let products = [
            mul0(self.lo, rhs.lo),
            mul0(self.lo, rhs.hi),
            mul0(self.hi, rhs.lo),
            mul0(self.hi, rhs.hi),
        ];
        let lo = products.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = products.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Interval {
            lo: round_down(lo),
            hi: round_up(hi),
        }
    }
}

impl Div for Interval {
    type Output = Interval;
    fn div(self, rhs: Interval) -> Interval {
        if rhs.contains(0.0) {
            return Interval::ENTIRE;
        }
        let quotients = [
            self.lo / rhs.lo,
            self.lo / rhs.hi,
            self.hi / rhs.lo,
            self.hi / rhs.hi,
        ];
        if quotients.iter().any(|q| q.is_nan()) {
            return Interval::ENTIRE;
        }
        let lo = quotients.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = quotients.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Interval {
            lo: round_down(lo),
            hi: round_up(hi),
        }
    }
}

/// `0 * inf` is taken as 0 (the bound belongs to an unbounded side).
#[inline]
fn mul0(a: f64, b: f64) -> f64 {
    if a == 0.0 || b == 0.0 {
        0.0
    } else {
        a * b
    }
}

/// Next representable value toward `-inf`; infinities and NaN pass through.
#[inline]
pub(crate) fn round_down(x: f64) -> f64 {
    if !x.is_finite() {
        return x;
    }
    if x == 0.0 {
        return -f64::from_bits(1);
    }
    let bits = x.to_bits();
    if x > 0.0 {
        f64::from_bits(bits - 1)
    } else {
        f64::from_bits(bits + 1)
    }
}

/// Next representable value toward `+inf`; infinities and NaN pass through.
#[inline]
pub(crate) fn round_up(x: f64) -> f64 {
    -round_down(-x)
}
