//! Incumbent set: certified objective pairs with the decision boxes that
//! achieved them, kept mutually non-dominated.

use std::collections::BTreeMap;

use nalgebra::Vector2;

use crate::geom::{weakly_dominates, Interval, OrdPoint};

#[derive(Clone, Debug, Default)]
pub struct IncumbentSet {
    map: BTreeMap<OrdPoint, Vec<Interval>>,
}

impl IncumbentSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Record `y` reached by box `x`. Rejected when an entry already weakly
    /// dominates `y`; entries `y` weakly dominates are dropped.
    pub fn insert(&mut self, y: Vector2<f64>, x: Vec<Interval>) -> bool {
        if !(y.x.is_finite() && y.y.is_finite()) {
            return false;
        }
        if self.map.keys().any(|k| weakly_dominates(k.0, y)) {
            return false;
        }
        self.map.retain(|k, _| !weakly_dominates(y, k.0));
        self.map.insert(OrdPoint(y), x);
        true
    }

    /// Objective pairs in increasing `y1` order.
    pub fn points(&self) -> impl Iterator<Item = Vector2<f64>> + '_ {
        self.map.keys().map(|k| k.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Vector2<f64>, &[Interval])> + '_ {
        self.map.iter().map(|(k, x)| (k.0, x.as_slice()))
    }

    /// Entry with the smallest `y1`.
    pub fn best_y1(&self) -> Option<Vector2<f64>> {
        self.map.keys().next().map(|k| k.0)
    }

    /// Entry with the smallest `y2`.
    pub fn best_y2(&self) -> Option<Vector2<f64>> {
        self.map.keys().next_back().map(|k| k.0)
    }
}
