use std::collections::HashSet;
use std::sync::atomic::AtomicBool;

use nalgebra::vector;

use super::*;
use crate::config::AxiomSet;
use crate::geom2::Line;
use crate::refs::{LineOrigin, PointOrigin, RefId};

fn config(axioms: &[u8], max_rank: usize) -> FinderConfig {
    FinderConfig {
        axioms: AxiomSet::from_numbers(axioms).unwrap(),
        max_rank,
        ..FinderConfig::default()
    }
}

fn build(cfg: &FinderConfig) -> Closure {
    Closure::build(cfg, &AtomicBool::new(false)).unwrap()
}

#[test]
fn unit_square_rank_one_with_axioms_one_and_two() {
    let closure = build(&config(&[1, 2], 1));
    let store = closure.store();

    let half = store
        .find_line(&Line::from_unit(vector![1.0, 0.0], 0.5))
        .unwrap();
    assert_eq!(store.line(half).rank, 1);
    for (p, q) in [
        (vector![0.0, 0.0], vector![1.0, 1.0]),
        (vector![0.0, 1.0], vector![1.0, 0.0]),
    ] {
        let diag = store.find_line(&Line::through(p, q).unwrap()).unwrap();
        assert_eq!(store.line(diag).rank, 1);
    }
    for p in [vector![0.5, 0.0], vector![0.5, 1.0]] {
        let id = store.find_point(p).unwrap();
        assert_eq!(store.point(id).rank, 1);
    }
    // x = 1/2, y = 1/2 and both diagonals; their edge hits off the corners.
    assert_eq!(
        closure.stats().ranks[1],
        RankCount {
            rank: 1,
            points: 4,
            lines: 4
        }
    );
    assert!(!closure.is_truncated());
}

#[test]
fn centre_is_found_at_rank_two() {
    let mut closure = build(&config(&[1, 2, 3, 4, 5, 6, 7], 2));
    let matches = closure.match_points(vector![0.5, 0.5]);
    let best = matches[0];
    assert!(best.distance_error < 1e-6);
    assert_eq!(best.rank, 2);
    assert_eq!(
        closure.store().point(best.id).distance_error,
        best.distance_error
    );
    assert!(matches.len() <= closure.config().tolerances.max_matches);
    assert!(matches
        .windows(2)
        .all(|w| w[0].distance_error <= w[1].distance_error));
}

#[test]
fn line_matching_is_undirected_and_capped() {
    let mut cfg = config(&[1, 2, 3], 2);
    cfg.tolerances.max_matches = 2;
    let mut closure = build(&cfg);
    let up = Line::through(vector![0.5, 0.0], vector![0.5, 1.0]).unwrap();
    let down = Line::through(vector![0.5, 1.0], vector![0.5, 0.0]).unwrap();
    let a = closure.match_lines(&up);
    let b = closure.match_lines(&down);
    assert!(!a.is_empty() && a.len() <= 2);
    assert_eq!(a[0].id, b[0].id);
    assert!(a[0].shift_error < 1e-9 && a[0].angle_error < 1e-6);
    assert_eq!(a[0].rank, 1);

    // Nothing lies near a line outside the sheet.
    let far = Line::from_unit(vector![1.0, 0.0], 5.0);
    assert!(closure.match_lines(&far).is_empty());
}

#[test]
fn keys_are_unique_and_derivations_respect_ranks() {
    let closure = build(&config(&[1, 2, 3, 4, 5, 6, 7], 2));
    let store = closure.store();
    let paper = closure.paper();

    let line_keys: HashSet<_> = store
        .line_ids()
        .map(|id| paper.line_key(&store.line(id).line))
        .collect();
    assert_eq!(line_keys.len(), store.num_lines());
    let point_keys: HashSet<_> = store
        .point_ids()
        .map(|id| paper.point_key(store.point(id).point))
        .collect();
    assert_eq!(point_keys.len(), store.num_points());

    let rank_of = |r: RefId| match r {
        RefId::Point(p) => store.point(p).rank,
        RefId::Line(l) => store.line(l).rank,
    };
    for id in store.line_ids() {
        let line = store.line(id);
        if let LineOrigin::Fold(axiom) = line.origin {
            let sum: usize = axiom.inputs().into_iter().map(rank_of).sum();
            assert_eq!(sum + 1, line.rank, "{axiom:?}");
        }
    }
    for id in store.point_ids() {
        let point = store.point(id);
        if let PointOrigin::Intersection(l1, l2) = point.origin {
            assert_eq!(store.line(l1).rank + store.line(l2).rank, point.rank);
            assert!(paper.encloses(point.point));
        }
    }
}

#[test]
fn builds_are_deterministic() {
    let cfg = config(&[1, 2, 3, 4, 5, 6, 7], 2);
    let a = build(&cfg);
    let b = build(&cfg);
    assert_eq!(a.stats(), b.stats());
    let lines = |c: &Closure| -> Vec<Line> {
        c.store().line_ids().map(|id| c.store().line(id).line).collect()
    };
    assert_eq!(lines(&a), lines(&b));
}

#[test]
fn caps_truncate_without_failing() {
    let mut cfg = config(&[1, 2, 3, 4, 5, 6, 7], 3);
    cfg.tolerances.max_lines = 12;
    let closure = build(&cfg);
    assert!(closure.is_truncated());
    assert!(closure.store().num_lines() <= 12);
    assert_eq!(closure.stats().total_lines(), closure.store().num_lines());

    let mut cfg = config(&[1, 2, 3], 3);
    cfg.tolerances.max_points = 10;
    let closure = build(&cfg);
    assert!(closure.is_truncated());
    assert!(closure.store().num_points() <= 10);
}

#[test]
fn raised_stop_flag_cancels() {
    let cfg = config(&[1, 2, 3, 4, 5, 6, 7], 3);
    let stop = AtomicBool::new(true);
    assert_eq!(
        Closure::build(&cfg, &stop).err(),
        Some(BuildError::Cancelled)
    );
}
