//! Three-tier staged buffer.
//!
//! Tiers
//! - `global`: max-heap on the cached `priority_bound`; the background,
//!   best-first order. Keys go stale as the front improves and are corrected
//!   lazily when an entry reaches the top.
//! - `next`: staging window sorted ascending by selection key, so the
//!   lowest-priority entry is first. Overflow spills to `global` while
//!   `current` is empty.
//! - `current`: the promoted window, drained from its highest key before
//!   `global` is consulted again.
//!
//! Ties on equal keys go to the entry pushed first.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::mem;

use serde::Serialize;
use tracing::{debug, trace};

use super::cfg::{BufferCfg, SelectionPolicy};
use crate::cell::Cell;
use crate::error::BufferError;
use crate::front::NonDominatedSet;

/// Counters of buffer traffic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BufferStats {
    pub pushes: u64,
    pub pops: u64,
    /// Entries moved from `next` to `global` on overflow.
    pub spills: u64,
    /// Whole staging windows moved into `current`.
    pub promotions: u64,
    /// Lazy key corrections on the top of `global`.
    pub reprioritizations: u64,
}

/// Buffer entry: a cell with the key it was filed under.
#[derive(Debug)]
struct Staged<C> {
    key: f64,
    seq: u64,
    cell: C,
}

impl<C> PartialEq for Staged<C> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<C> Eq for Staged<C> {}

impl<C> PartialOrd for Staged<C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Larger key is greater; on equal keys the earlier entry is greater.
impl<C> Ord for Staged<C> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key
            .total_cmp(&other.key)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Capacity-bounded staged priority buffer over cells.
#[derive(Debug)]
pub struct StagedCellBuffer<C> {
    cfg: BufferCfg,
    global: BinaryHeap<Staged<C>>,
    next: Vec<Staged<C>>,
    current: Vec<Staged<C>>,
    primed: bool,
    seq: u64,
    stats: BufferStats,
}

impl<C: Cell> Default for StagedCellBuffer<C> {
    fn default() -> Self {
        Self::new(BufferCfg::default())
    }
}

impl<C: Cell> StagedCellBuffer<C> {
    pub fn new(cfg: BufferCfg) -> Self {
        Self {
            cfg,
            global: BinaryHeap::new(),
            next: Vec::new(),
            current: Vec::new(),
            primed: false,
            seq: 0,
            stats: BufferStats::default(),
        }
    }

    pub fn cfg(&self) -> &BufferCfg {
        &self.cfg
    }

    pub fn stats(&self) -> BufferStats {
        self.stats
    }

    /// The first cell has been accepted.
    pub fn is_primed(&self) -> bool {
        self.primed
    }

    /// Cells over all tiers.
    pub fn len(&self) -> usize {
        self.global.len() + self.next.len() + self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.global.is_empty() && self.next.is_empty() && self.current.is_empty()
    }

    pub fn global_len(&self) -> usize {
        self.global.len()
    }

    pub fn next_len(&self) -> usize {
        self.next.len()
    }

    pub fn current_len(&self) -> usize {
        self.current.len()
    }

    /// Take ownership of `cell`. Its bound is tightened to the current
    /// distance to `front` if that is smaller; the very first cell seeds
    /// `global`, later ones enter the staging window.
    pub fn push(&mut self, mut cell: C, front: &NonDominatedSet) {
        let d = front.distance(&cell);
        if d < cell.priority_bound() {
            cell.set_priority_bound(d);
        }
        let seq = self.seq;
        self.seq += 1;
        self.stats.pushes += 1;

        if !self.primed && self.is_empty() {
            self.primed = true;
            trace!(bound = cell.priority_bound(), "buffer seeded");
            self.global.push(Staged {
                key: cell.priority_bound(),
                seq,
                cell,
            });
            return;
        }

        let key = match self.cfg.policy {
            SelectionPolicy::DistanceToFront => cell.priority_bound(),
            SelectionPolicy::CrowdingDistance => front.crowding(cell.objectives().lower()),
        };
        let entry = Staged { key, seq, cell };
        let at = self.next.partition_point(|e| *e < entry);
        self.next.insert(at, entry);
        trace!(key, staged = self.next.len(), "cell staged");

        while self.next.len() > self.cfg.capacity && self.current.is_empty() {
            let low = self.next.remove(0);
            let bound = low.cell.priority_bound();
            debug!(key = low.key, bound, "staging overflow spilled to global");
            self.global.push(Staged {
                key: bound,
                seq: low.seq,
                cell: low.cell,
            });
            self.stats.spills += 1;
        }
    }

    /// Hand out the next cell: the staging window is promoted when `current`
    /// ran dry, `current` is drained first, then the corrected top of `global`.
    pub fn pop(&mut self, front: &NonDominatedSet) -> Result<C, BufferError> {
        if self.current.is_empty() && !self.next.is_empty() {
            self.current = mem::take(&mut self.next);
            self.stats.promotions += 1;
            debug!(window = self.current.len(), "staging window promoted");
        }
        if let Some(entry) = self.current.pop() {
            self.stats.pops += 1;
            return Ok(entry.cell);
        }
        self.stabilize(front);
        let entry = self.global.pop().ok_or(BufferError::Empty)?;
        self.stats.pops += 1;
        trace!(bound = entry.key, remaining = self.global.len(), "popped from global");
        Ok(entry.cell)
    }

    /// Best cell of `global` after lazy re-prioritization; `None` when
    /// `global` is empty. Mutates the heap layout.
    pub fn top(&mut self, front: &NonDominatedSet) -> Option<&C> {
        self.stabilize(front);
        self.global.peek().map(|e| &e.cell)
    }

    /// Drop every owned cell; returns how many were dropped.
    pub fn flush(&mut self) -> usize {
        let n = self.len();
        self.global.clear();
        self.next.clear();
        self.current.clear();
        debug!(dropped = n, "buffer flushed");
        n
    }

    /// Re-key the top of `global` until its cached bound is no larger than
    /// its fresh distance.
    fn stabilize(&mut self, front: &NonDominatedSet) {
        if self.cfg.hypervolume_only {
            return;
        }
        while let Some(mut top) = self.global.peek_mut() {
            let d = front.distance(&top.cell);
            if !(d < top.cell.priority_bound()) {
                break;
            }
            debug!(from = top.cell.priority_bound(), to = d, "lazy re-prioritization");
            top.cell.set_priority_bound(d);
            top.key = d;
            self.stats.reprioritizations += 1;
            // dropping the PeekMut sifts the entry down
        }
    }
}
