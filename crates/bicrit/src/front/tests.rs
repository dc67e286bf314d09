use super::*;
use crate::cell::{BoxCell, LbCut, ObjBox};
use crate::error::NoIntersection;
use crate::geom::{dominates, weakly_dominates, Interval, Pt2};
use nalgebra::{vector, Vector2};
use proptest::prelude::*;

fn nds_of(points: &[Vector2<f64>]) -> NonDominatedSet {
    let mut nds = NonDominatedSet::new();
    for &p in points {
        nds.insert_point(p);
    }
    nds
}

fn boxed(y1: (f64, f64), y2: (f64, f64)) -> BoxCell {
    BoxCell::from_objectives(Interval::new(y1.0, y1.1), Interval::new(y2.0, y2.1))
}

// ---------------------------------------------------------------------------
// NonDominatedSet
// ---------------------------------------------------------------------------

#[test]
fn point_insert_prunes_dominated_points() {
    let mut nds = nds_of(&[vector![1.0, 5.0], vector![3.0, 2.0], vector![6.0, 1.0]]);
    assert_eq!(nds.len(), 3);
    assert!(!nds.insert_point(vector![4.0, 3.0]), "dominated point changes nothing");
    assert!(nds.insert_point(vector![2.0, 1.5]));
    let pts: Vec<_> = nds.points().collect();
    assert_eq!(pts, vec![vector![1.0, 5.0], vector![2.0, 1.5], vector![6.0, 1.0]]);
    assert!(nds.is_staircase());
}

#[test]
fn equal_coordinate_points_are_weakly_dominated() {
    let mut nds = nds_of(&[vector![1.0, 5.0]]);
    assert!(!nds.insert_point(vector![3.0, 5.0]));
    assert!(!nds.insert_point(vector![1.0, 7.0]));
    assert!(nds.insert_point(vector![1.0, 4.0]));
    assert_eq!(nds.points().collect::<Vec<_>>(), vec![vector![1.0, 4.0]]);
}

#[test]
fn dominated_corner_has_non_positive_distance() {
    let nds = nds_of(&[vector![1.0, 5.0]]);
    let cell = boxed((2.0, 4.0), (6.0, 9.0));
    assert!(nds.distance(&cell) <= 0.0);
    assert!(nds.is_dominated(vector![2.0, 6.0]));
}

#[test]
fn distance_follows_the_diagonal() {
    let nds = nds_of(&[vector![1.0, 5.0], vector![3.0, 2.0]]);
    // (0,0) + (3,3) lands on the vertical drop below the corner (3,5)
    let d = nds.distance_point(vector![0.0, 0.0]);
    assert!(d >= 3.0 && d - 3.0 < 1e-9, "d = {d}");
    assert_eq!(NonDominatedSet::new().distance_point(vector![0.0, 0.0]), f64::INFINITY);
}

#[test]
fn segment_dominates_the_region_above_it() {
    let mut nds = NonDominatedSet::new();
    assert!(nds.insert_segment(vector![4.0, 0.0], vector![0.0, 4.0]));
    assert_eq!(nds.points().collect::<Vec<_>>(), vec![vector![0.0, 4.0], vector![4.0, 0.0]]);
    assert!(nds.is_dominated(vector![2.0, 2.0 + 1e-9]));
    assert!(!nds.is_dominated(vector![1.9, 1.9]));
    assert!(nds.is_dominated(vector![9.0, 0.0]));
    let d = nds.distance_point(vector![1.0, 1.0]);
    assert!(d >= 1.0 && d - 1.0 < 1e-9);

    // a point below the segment splits it; the crossing is a corner only
    assert!(nds.insert_point(vector![2.0, 1.0]));
    let pts: Vec<_> = nds.points().collect();
    assert_eq!(pts, vec![vector![0.0, 4.0], vector![2.0, 1.0], vector![4.0, 0.0]]);
    assert!(nds.vertices().len() > pts.len());
    assert!(nds.is_dominated(vector![3.5, 0.6]));
    assert!(!nds.is_dominated(vector![2.5, 0.9]));
    assert!(nds.is_staircase());
}

#[test]
fn degenerate_segments_reduce_to_their_best_end() {
    let mut nds = NonDominatedSet::new();
    nds.insert_segment(vector![1.0, 1.0], vector![2.0, 3.0]);
    assert_eq!(nds.points().collect::<Vec<_>>(), vec![vector![1.0, 1.0]]);
    nds.clear();
    nds.insert_segment(vector![0.5, 3.0], vector![0.5, 1.0]);
    assert_eq!(nds.points().collect::<Vec<_>>(), vec![vector![0.5, 1.0]]);
}

#[test]
fn cut_segment_distance_is_tighter_than_corner() {
    let nds = nds_of(&[vector![1.0, 6.0], vector![6.0, 1.0]]);
    let plain = boxed((0.0, 10.0), (0.0, 10.0));
    let cut = plain.clone().with_cut(LbCut { a: 1.0, w_lb: 5.0 });
    let d_corner = nds.distance(&plain);
    let d_cut = nds.distance(&cut);
    assert!((d_corner - 6.0).abs() < 1e-9);
    assert!((d_cut - 3.5).abs() < 1e-9, "d_cut = {d_cut}");
}

#[test]
fn crowding_measures_bracketing_gap() {
    let nds = nds_of(&[vector![1.0, 5.0], vector![3.0, 2.0], vector![6.0, 1.0]]);
    assert_eq!(nds.crowding(vector![2.0, 4.0]), 5.0);
    assert_eq!(nds.crowding(vector![4.0, 0.0]), 4.0);
    assert_eq!(nds.crowding(vector![0.0, 9.0]), f64::INFINITY);
    assert_eq!(nds.crowding(vector![7.0, 0.0]), f64::INFINITY);
}

#[test]
fn non_dominated_points_outside_the_lower_cone() {
    let nds = nds_of(&[vector![1.0, 5.0], vector![3.0, 3.0], vector![5.0, 1.0]]);
    let lb = vector![2.0, 2.0];
    assert_eq!(nds.non_dominated_points(lb, false), vec![vector![1.0, 5.0], vector![5.0, 1.0]]);
    assert_eq!(
        nds.non_dominated_points(lb, true),
        vec![vector![1.0, 5.0], vector![2.0, 5.0], vector![5.0, 2.0], vector![5.0, 1.0]]
    );
    assert!(nds.non_dominated_points(vector![-1.0, -1.0], true).is_empty());
    assert!(NonDominatedSet::new().non_dominated_points(lb, true).is_empty());
}

#[test]
fn cutting_points_lie_on_a_certified_edge() {
    let mut nds = NonDominatedSet::new();
    nds.insert_segment(vector![0.0, 4.0], vector![4.0, 0.0]);
    let pts = nds.non_dominated_points(vector![1.0, 1.0], true);
    let want = [vector![0.0, 4.0], vector![1.0, 3.0], vector![3.0, 1.0], vector![4.0, 0.0]];
    assert_eq!(pts.len(), want.len());
    for (p, w) in pts.iter().zip(want) {
        assert!((p - w).norm() < 1e-9, "{p:?} vs {w:?}");
        assert!(p.x >= w.x && p.y >= w.y);
    }
}

#[test]
fn point_intersection_is_dominated_by_exact_crossing() {
    let c = NonDominatedSet::point_intersection(
        vector![0.0, 10.0],
        vector![10.0, 0.0],
        vector![0.0, 0.0],
        vector![10.0, 10.0],
    )
    .expect("crossing");
    assert!(weakly_dominates(vector![5.0, 5.0], c));
    assert!((c - vector![5.0, 5.0]).norm() < 1e-9);

    let none = NonDominatedSet::point_intersection(
        vector![0.0, 2.0],
        vector![2.0, 0.0],
        vector![0.0, 3.0],
        vector![3.0, 0.0],
    );
    assert_eq!(none, Err(NoIntersection));
}

fn pareto(points: &[Vector2<f64>]) -> Vec<Vector2<f64>> {
    let mut out: Vec<Vector2<f64>> = points
        .iter()
        .copied()
        .filter(|p| !points.iter().any(|q| q != p && weakly_dominates(*q, *p)))
        .collect();
    out.sort_by(|a, b| a.x.total_cmp(&b.x));
    out.dedup();
    out
}

fn grid_point() -> impl Strategy<Value = Vector2<f64>> {
    (0u16..320, 0u16..320).prop_map(|(a, b)| vector![a as f64 / 8.0, b as f64 / 8.0])
}

proptest! {
    #[test]
    fn prop_points_keep_exactly_the_pareto_set(pts in prop::collection::vec(grid_point(), 1..40)) {
        let nds = nds_of(&pts);
        prop_assert!(nds.is_staircase());
        prop_assert_eq!(nds.points().collect::<Vec<_>>(), pareto(&pts));
    }

    #[test]
    fn prop_segments_keep_antichain_and_cover_inputs(
        segs in prop::collection::vec((grid_point(), grid_point(), any::<bool>()), 1..25)
    ) {
        let mut nds = NonDominatedSet::new();
        for &(a, b, as_point) in &segs {
            if as_point {
                nds.insert_point(a);
            } else {
                nds.insert_segment(a, b);
            }
            prop_assert!(nds.is_staircase());
        }
        let pts: Vec<_> = nds.points().collect();
        for p in &pts {
            for q in &pts {
                prop_assert!(!dominates(*p, *q));
            }
        }
        let nudge = vector![1e-6, 1e-6];
        for &(a, b, as_point) in &segs {
            prop_assert!(nds.is_dominated(a + nudge));
            if !as_point {
                prop_assert!(nds.is_dominated(b + nudge));
            }
        }
    }

    #[test]
    fn prop_distance_sign_matches_dominance(
        pts in prop::collection::vec(grid_point(), 1..20),
        q in grid_point(),
    ) {
        let nds = nds_of(&pts);
        let d = nds.distance_point(q);
        let strictly_dominated = pts.iter().any(|p| p.x < q.x && p.y < q.y);
        if strictly_dominated {
            prop_assert!(d <= 0.0);
        }
        if !nds.is_dominated(q) {
            prop_assert!(d > 0.0);
        }
    }
}

// ---------------------------------------------------------------------------
// LowerFrontier
// ---------------------------------------------------------------------------

fn square_frontier() -> LowerFrontier {
    LowerFrontier::new(Interval::new(0.0, 10.0), Interval::new(0.0, 10.0))
}

#[test]
fn diagonal_segment_cuts_the_seed_square() {
    let mut lb = square_frontier();
    assert!(lb.is_empty());
    assert!(lb.insert_segment(Pt2::new(0.0, 10.0), Pt2::new(10.0, 0.0)));
    assert!(!lb.points().any(|p| p == vector![10.0, 10.0]));
    let y = lb.boundary_at(5.0).expect("inside the box");
    assert!((y - 5.0).abs() < 1e-9, "boundary at 5 is {y}");
    assert!(lb.is_staircase());
}

#[test]
fn point_insert_carves_a_step() {
    let mut lb = square_frontier();
    assert!(lb.insert_point(Pt2::new(5.0, 5.0)));
    let pts: Vec<_> = lb.points().collect();
    assert_eq!(
        pts,
        vec![
            vector![0.0, 10.0],
            vector![5.0, 10.0],
            vector![5.0, 5.0],
            vector![10.0, 5.0],
            vector![10.0, 0.0],
        ]
    );
    // a point above the step adds nothing
    assert!(!lb.insert_point(Pt2::new(7.0, 6.0)));
    assert_eq!(lb.boundary_at(-1.0), None);
}

#[test]
fn cell_update_uses_the_cut_segment() {
    let mut lb = square_frontier();
    let cell = boxed((0.0, 10.0), (0.0, 10.0)).with_cut(LbCut { a: 1.0, w_lb: 10.0 });
    assert!(lb.update_with_cell(&cell));
    let y = lb.boundary_at(4.0).expect("inside");
    assert!((y - 6.0).abs() < 1e-9);
    lb.clear();
    assert!(lb.is_empty());
}

proptest! {
    #[test]
    fn prop_lower_frontier_stays_a_staircase_below_inputs(
        segs in prop::collection::vec((0u8..=40, 0u8..=40, 0u8..=40, 0u8..=40), 1..20)
    ) {
        let mut lb = square_frontier();
        let mut inputs = Vec::new();
        for &(a, b, c, d) in &segs {
            let p1 = Pt2::new(a as f64 / 4.0, b as f64 / 4.0);
            let p2 = Pt2::new(c as f64 / 4.0, d as f64 / 4.0);
            lb.insert_segment(p1, p2);
            prop_assert!(lb.is_staircase());
            inputs.push(p1.mid());
            inputs.push(p2.mid());
        }
        let pts: Vec<_> = lb.points().collect();
        prop_assert_eq!(pts.first().copied(), Some(vector![0.0, 10.0]));
        prop_assert_eq!(pts.last().copied(), Some(vector![10.0, 0.0]));
        for p in inputs {
            let y = lb.boundary_at(p.x).expect("inside the box");
            prop_assert!(y <= p.y + 1e-9, "boundary {} above input {:?}", y, p);
        }
    }
}

#[test]
fn stacked_merges_near_the_right_edge_keep_a_sound_staircase() {
    let mut lb = square_frontier();
    assert!(lb.insert_segment(Pt2::new(8.0, 6.5), Pt2::new(10.0, 3.25)));
    assert!(lb.insert_point(Pt2::new(8.5, 3.25)));
    assert!(lb.insert_segment(Pt2::new(8.0, 2.25), Pt2::new(10.0, 0.0)));
    assert!(lb.is_staircase());

    // the last segment is the lowest piece over [8, 10]
    let y = lb.boundary_at(9.0).expect("inside the box");
    assert!(y <= 1.125 + 1e-12 && (y - 1.125).abs() < 1e-9, "boundary at 9 is {y}");
    let y = lb.boundary_at(8.0).expect("inside the box");
    assert!((y - 2.25).abs() < 1e-12);

    let pts: Vec<_> = lb.points().collect();
    assert_eq!(pts.len(), 5);
    assert_eq!(pts[..3], [vector![0.0, 10.0], vector![8.0, 10.0], vector![8.0, 2.25]]);
    assert!((pts[3] - vector![8.5, 1.6875]).norm() < 1e-9);
    assert_eq!(pts[4], vector![10.0, 0.0]);
}

#[test]
fn segments_ending_on_the_box_border() {
    let mut lb = square_frontier();
    // ends on the right edge
    assert!(lb.insert_segment(Pt2::new(4.0, 6.0), Pt2::new(10.0, 3.0)));
    // ends on the bottom edge
    assert!(lb.insert_segment(Pt2::new(6.0, 4.0), Pt2::new(9.0, 0.0)));
    assert!(lb.is_staircase());

    let at = |x: f64| lb.boundary_at(x).expect("inside the box");
    assert_eq!(at(4.0), 6.0);
    assert!((at(5.0) - 5.5).abs() < 1e-9);
    assert!((at(7.0) - 8.0 / 3.0).abs() < 1e-9);
    assert_eq!(at(9.5), 0.0);
    assert_eq!(at(10.0), 0.0);
    assert_eq!(lb.points().last(), Some(vector![10.0, 0.0]));

    // the box corner adds nothing
    assert!(!lb.insert_point(Pt2::new(10.0, 0.0)));
}

#[test]
fn interval_inputs_enter_at_their_lower_corner() {
    let mut lb = square_frontier();
    let p = Pt2::from_intervals(Interval::new(4.0, 5.0), Interval::new(3.0, 4.0));
    assert!(lb.insert_point(p));
    assert_eq!(lb.boundary_at(4.0), Some(3.0));
    assert_eq!(lb.boundary_at(3.5), Some(10.0));
}

/// Exact lower envelope of the seed square and the regions of `segs`.
fn union_boundary(segs: &[(Vector2<f64>, Vector2<f64>)], x: f64) -> f64 {
    let seed = if x < 10.0 { 10.0 } else { 0.0 };
    segs.iter().fold(seed, |y, &(p1, p2)| {
        let r = if x < p1.x {
            f64::INFINITY
        } else if x >= p2.x {
            p2.y
        } else {
            p1.y + (x - p1.x) * (p2.y - p1.y) / (p2.x - p1.x)
        };
        y.min(r)
    })
}

proptest! {
    #[test]
    fn prop_lower_frontier_matches_union_of_regions(
        raw in prop::collection::vec((0u8..=40, 0u8..=40, 0u8..=40, 0u8..=40), 1..12)
    ) {
        let mut lb = square_frontier();
        let mut segs = Vec::new();
        for &(a, b, c, d) in &raw {
            let (a, b, c, d) = (a as f64 / 4.0, b as f64 / 4.0, c as f64 / 4.0, d as f64 / 4.0);
            let p1 = vector![a.min(c), b.max(d)];
            let p2 = vector![a.max(c), b.min(d)];
            lb.insert_segment(p1.into(), p2.into());
            segs.push((p1, p2));
        }
        prop_assert!(lb.is_staircase());
        for k in 0..=400 {
            let x = k as f64 / 40.0;
            let truth = union_boundary(&segs, x);
            let y = lb.boundary_at(x).expect("inside the box");
            prop_assert!(y <= truth + 1e-9, "boundary {} above union {} at {}", y, truth, x);
            prop_assert!(y >= truth - 1e-6, "boundary {} far below union {} at {}", y, truth, x);
        }
    }
}

// ---------------------------------------------------------------------------
// IncumbentSet + FrontMetrics
// ---------------------------------------------------------------------------

fn metrics_for(incumbents: &[Vector2<f64>], cells: &[ObjBox]) -> (FrontMetrics, IncumbentSet) {
    let mut m = FrontMetrics::new();
    let mut ub = IncumbentSet::new();
    for &y in incumbents {
        ub.insert(y, Vec::new());
        m.observe_incumbent(y);
    }
    for c in cells {
        m.observe_cell(c);
    }
    (m, ub)
}

#[test]
fn nadir_from_extremes_and_cells() {
    let (mut m, _) = metrics_for(&[vector![1.0, 5.0], vector![3.0, 2.0]], &[]);
    assert_eq!(m.nadir(), Some(vector![3.0, 5.0]));
    assert_eq!(m.y1_best(), Some(vector![1.0, 5.0]));
    assert_eq!(m.y2_best(), Some(vector![3.0, 2.0]));
    m.observe_cell(&ObjBox::new(Interval::new(0.0, 6.0), Interval::new(0.0, 8.0)));
    assert_eq!(m.nadir(), Some(vector![6.0, 8.0]));
    // smaller boxes never lower it
    m.observe_cell(&ObjBox::new(Interval::new(0.0, 1.0), Interval::new(0.0, 1.0)));
    assert_eq!(m.nadir(), Some(vector![6.0, 8.0]));
    // a box beyond both extremes does not touch it
    m.observe_cell(&ObjBox::new(Interval::new(4.0, 20.0), Interval::new(3.0, 20.0)));
    assert_eq!(m.nadir(), Some(vector![6.0, 8.0]));
}

#[test]
fn hypervolumes_bracket_the_front() {
    let cells = [ObjBox::new(Interval::new(0.0, 6.0), Interval::new(0.0, 8.0))];
    let (m, ub) = metrics_for(&[vector![1.0, 5.0], vector![3.0, 2.0]], &cells);

    let hv_ub = m.hypervolume_ub(&ub);
    // 2*3 from (1,5) plus the tail 3*6 from (3,2) up to y1_max = 6
    assert!(hv_ub.contains(24.0) && hv_ub.width() < 1e-9);

    let mut lb = LowerFrontier::new(Interval::new(0.0, 6.0), Interval::new(0.0, 8.0));
    lb.insert_point(Pt2::new(1.0, 1.0));
    let hv_lb = m.hypervolume_lb(&lb);
    assert!(hv_lb.contains(35.0) && hv_lb.width() < 1e-9);

    let gap = m.gap(&lb, &ub);
    assert!(gap.lb() > 10.0 && gap.ub() < 12.0);
}

#[test]
fn lower_hypervolume_clips_edges_at_the_nadir() {
    let cells = [ObjBox::new(Interval::new(0.0, 4.0), Interval::new(0.0, 8.0))];
    let (m, _) = metrics_for(&[], &cells);
    assert_eq!(m.nadir(), Some(vector![4.0, 8.0]));
    let mut lb = LowerFrontier::new(Interval::new(0.0, 6.0), Interval::new(0.0, 8.0));
    lb.insert_segment(Pt2::new(0.0, 6.0), Pt2::new(6.0, 0.0));
    let hv = m.hypervolume_lb(&lb);
    // trapezoid over [0,4] between y2 = 6 - y1 and y2 = 8
    assert!((hv.mid() - 16.0).abs() < 1e-9 && hv.contains(16.0));
}

#[test]
fn hypervolumes_vanish_without_nadir() {
    let m = FrontMetrics::new();
    assert_eq!(m.hypervolume_ub(&IncumbentSet::new()), Interval::ZERO);
    assert_eq!(m.hypervolume_lb(&square_frontier()), Interval::ZERO);
}
