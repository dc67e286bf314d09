//! Demo branch-and-bound driver on a synthetic bicriteria problem.
//!
//! Problem: `x in [0,1]^dim`, minimize
//! - `f1(x) = mean(x)`
//! - `f2(x) = mean((x - c)^2)` with a target `c` drawn from `[0.5, 1]^dim`.
//!
//! Both objectives are evaluated in interval arithmetic, so every cell's
//! objective box encloses its image. The two goals conflict along the
//! segment from the origin towards `c`.

use anyhow::Result;
use bicrit::prelude::*;
use bicrit::buffer::BufferStats;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::{FileCfg, RunCfg};

/// Cells narrower than this in every dimension are closed as leaves.
const MIN_WIDTH: f64 = 1e-9;
const LOG_EVERY: usize = 500;

#[derive(Debug, Serialize)]
pub struct RunReport {
    pub version: &'static str,
    pub iterations: usize,
    /// Closed with a distance bound at most `eps`.
    pub pruned: usize,
    /// Closed because they could not be split further.
    pub leaves: usize,
    /// Still queued when `max_iters` ran out.
    pub unexplored: usize,
    pub stats: BufferStats,
    pub nadir: Option<[f64; 2]>,
    pub hypervolume_lb: [f64; 2],
    pub hypervolume_ub: [f64; 2],
    pub gap: [f64; 2],
    pub front: Vec<[f64; 2]>,
    pub lower_frontier: Vec<[f64; 2]>,
}

struct Problem {
    target: Vec<f64>,
}

impl Problem {
    fn new(cfg: &RunCfg) -> Self {
        let mut rng = StdRng::seed_from_u64(cfg.seed);
        let target = (0..cfg.dim).map(|_| rng.gen_range(0.5..=1.0)).collect();
        Self { target }
    }

    fn objectives(&self, x: &[Interval]) -> ObjBox {
        let n = Interval::point(x.len() as f64);
        let mut s1 = Interval::ZERO;
        let mut s2 = Interval::ZERO;
        for (xi, &ci) in x.iter().zip(&self.target) {
            s1 += *xi;
            s2 += sqr(*xi - Interval::point(ci));
        }
        ObjBox::new(s1 / n, s2 / n)
    }

    fn cell(&self, x: Vec<Interval>, depth: u32, bound: f64) -> BoxCell {
        let y = self.objectives(&x);
        let mut cell = BoxCell::new(x, y).with_priority_bound(bound);
        cell.depth = depth;
        cell
    }
}

fn sqr(v: Interval) -> Interval {
    (v * v)
        .meet(Interval::new(0.0, f64::INFINITY))
        .unwrap_or(Interval::ZERO)
}

/// Split `cell` at the midpoint of its widest decision dimension.
fn bisect(problem: &Problem, cell: &BoxCell) -> Option<(BoxCell, BoxCell)> {
    let (i, widest) = cell
        .x
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.width().total_cmp(&b.1.width()))?;
    if widest.width() < MIN_WIDTH {
        return None;
    }
    let m = widest.mid();
    let mut left = cell.x.clone();
    let mut right = cell.x.clone();
    left[i] = Interval::new(widest.lb(), m);
    right[i] = Interval::new(m, widest.ub());
    let depth = cell.depth + 1;
    let bound = cell.priority_bound();
    Some((
        problem.cell(left, depth, bound),
        problem.cell(right, depth, bound),
    ))
}

struct Search {
    nds: NonDominatedSet,
    ub: IncumbentSet,
    lb: LowerFrontier,
    metrics: FrontMetrics,
}

impl Search {
    /// Cell leaves the search: its reachable region now bounds the front from below.
    fn close(&mut self, cell: &BoxCell) {
        self.metrics.observe_cell(&cell.y);
        self.lb.update_with_cell(cell);
    }

    /// Midpoint of `cell` as a certified incumbent.
    fn sample(&mut self, problem: &Problem, cell: &BoxCell) {
        let x: Vec<Interval> = cell.x.iter().map(|v| Interval::point(v.mid())).collect();
        let y = problem.objectives(&x).upper();
        if self.ub.insert(y, x) {
            self.nds.insert_point(y);
            self.metrics.observe_incumbent(y);
        }
    }
}

pub fn run(cfg: &FileCfg) -> Result<RunReport> {
    cfg.validate()?;
    let run = cfg.run;
    let problem = Problem::new(&run);
    let root = problem.cell(vec![Interval::UNIT; run.dim], 0, f64::INFINITY);

    let mut search = Search {
        nds: NonDominatedSet::new(),
        ub: IncumbentSet::new(),
        lb: LowerFrontier::new(root.y.y1, root.y.y2),
        metrics: FrontMetrics::new(),
    };
    let mut buf = StagedCellBuffer::new(cfg.buffer);
    buf.push(root, &search.nds);

    let (mut iterations, mut pruned, mut leaves) = (0usize, 0usize, 0usize);
    while iterations < run.max_iters {
        let cell = match buf.pop(&search.nds) {
            Ok(cell) => cell,
            Err(BufferError::Empty) => break,
        };
        iterations += 1;

        if cell.priority_bound() <= run.eps {
            pruned += 1;
            search.close(&cell);
            continue;
        }
        search.sample(&problem, &cell);
        match bisect(&problem, &cell) {
            Some((a, b)) => {
                buf.push(a, &search.nds);
                buf.push(b, &search.nds);
            }
            None => {
                leaves += 1;
                search.close(&cell);
            }
        }

        if iterations % LOG_EVERY == 0 {
            let best = buf.top(&search.nds).map(|c| c.priority_bound());
            info!(
                iterations,
                queued = buf.len(),
                front = search.nds.len(),
                best_bound = ?best,
                "progress"
            );
        }
    }

    // anything left unexplored still bounds the front from below
    let mut unexplored = 0usize;
    while let Ok(cell) = buf.pop(&search.nds) {
        unexplored += 1;
        search.close(&cell);
    }
    debug!(unexplored, "buffer drained");

    let Search {
        nds,
        ub,
        lb,
        metrics,
    } = search;
    let hv_lb = metrics.hypervolume_lb(&lb);
    let hv_ub = metrics.hypervolume_ub(&ub);
    let gap = hv_lb - hv_ub;
    info!(
        iterations,
        pruned,
        leaves,
        front = nds.len(),
        hv_lb = hv_lb.mid(),
        hv_ub = hv_ub.mid(),
        "run finished"
    );

    Ok(RunReport {
        version: bicrit::VERSION,
        iterations,
        pruned,
        leaves,
        unexplored,
        stats: buf.stats(),
        nadir: metrics.nadir().map(|p| [p.x, p.y]),
        hypervolume_lb: bounds(hv_lb),
        hypervolume_ub: bounds(hv_ub),
        gap: bounds(gap),
        front: nds.points().map(|p| [p.x, p.y]).collect(),
        lower_frontier: lb.points().map(|p| [p.x, p.y]).collect(),
    })
}

fn bounds(v: Interval) -> [f64; 2] {
    [v.lb(), v.ub()]
}
