use super::*;
use crate::paper::Edge;
use nalgebra::vector;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn unit() -> Paper {
    Paper::new(1.0, 1.0)
}

fn sample_point<R: Rng>(rng: &mut R) -> Vector2<f64> {
    vector![rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0)]
}

fn same_line(a: &Line, b: &Line) -> bool {
    let (shift, angle) = a.error_against(b);
    shift < 1e-9 && angle < 1e-6
}

#[test]
fn axiom1_returns_a_line_iff_the_fold_is_valid() {
    let paper = unit();
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let (p1, p2) = (sample_point(&mut rng), sample_point(&mut rng));
        let expected = Line::through(p1, p2).filter(|l| paper.contains(l));
        let got = axiom1(&paper, p1, p2);
        assert_eq!(got.is_some(), expected.is_some());
        if let Some(fold) = got {
            assert!(fold.contains(p1, 1e-9) && fold.contains(p2, 1e-9));
        }
    }
    // Two corners on the same edge only reproduce that edge, which cuts off nothing.
    assert!(axiom1(&paper, vector![0.0, 0.0], vector![1.0, 0.0]).is_none());
    assert!(axiom1(&paper, vector![0.0, 0.0], vector![1.0, 1.0]).is_some());
}

#[test]
fn axiom2_bisector_is_equidistant() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..200 {
        let (p1, p2) = (sample_point(&mut rng), sample_point(&mut rng));
        let b = perpendicular_bisector(p1, p2).unwrap();
        assert!(b.contains(midpoint(p1, p2), 1e-12));
        assert!((b.distance_to(p1) - b.distance_to(p2)).abs() < 1e-12);
        assert!((b.reflect(p1) - p2).norm() < 1e-12);
    }
    let paper = unit();
    let fold = axiom2(&paper, vector![0.0, 0.0], vector![1.0, 0.0]).unwrap();
    assert!(same_line(&fold, &Line::from_unit(vector![1.0, 0.0], 0.5)));
}

#[test]
fn axiom3_parallel_lines_give_the_midline() {
    let paper = unit();
    let folds = axiom3(&paper, &paper.edge(Edge::Left), &paper.edge(Edge::Right));
    assert_eq!(folds.len(), 1);
    assert!(same_line(&folds[0], &Line::from_unit(vector![1.0, 0.0], 0.5)));

    // Same pair with the left edge carrying the opposite normal.
    let left = Line::from_unit(vector![-1.0, 0.0], 0.0);
    let folds = axiom3(&paper, &left, &paper.edge(Edge::Right));
    assert_eq!(folds.len(), 1);
    assert!(same_line(&folds[0], &Line::from_unit(vector![1.0, 0.0], 0.5)));
}

#[test]
fn axiom3_intersecting_lines_give_at_most_two_bisectors() {
    let paper = unit();
    // Left and bottom edges meet at a corner; only the diagonal survives.
    let folds = axiom3(&paper, &paper.edge(Edge::Left), &paper.edge(Edge::Bottom));
    assert_eq!(folds.len(), 1);
    let diag = Line::through(vector![0.0, 0.0], vector![1.0, 1.0]).unwrap();
    assert!(same_line(&folds[0], &diag));

    let anti = Line::through(vector![0.0, 1.0], vector![1.0, 0.0]).unwrap();
    let folds = axiom3(&paper, &diag, &anti);
    assert_eq!(folds.len(), 2);
    assert!(folds
        .iter()
        .any(|f| same_line(f, &Line::from_unit(vector![1.0, 0.0], 0.5))));
    assert!(folds
        .iter()
        .any(|f| same_line(f, &Line::from_unit(vector![0.0, 1.0], 0.5))));
}

#[test]
fn axiom4_needs_the_foot_on_the_paper() {
    let paper = unit();
    let fold = axiom4(&paper, vector![0.5, 0.5], &paper.edge(Edge::Bottom)).unwrap();
    assert!(same_line(&fold, &Line::from_unit(vector![1.0, 0.0], 0.5)));

    // Shallow line near the top edge: the foot from the origin lies left of the sheet.
    let shallow = Line::through(vector![0.0, 0.9], vector![1.0, 1.0]).unwrap();
    assert!(axiom4(&paper, vector![0.0, 0.0], &shallow).is_none());
}

#[test]
fn axiom5_folds_through_p2_and_lands_on_the_line() {
    let paper = unit();
    let left = paper.edge(Edge::Left);
    // Images (0, 0) and (0, 1); the latter puts the midpoint on p2 and is dropped.
    let folds = axiom5(&paper, vector![1.0, 0.0], &left, vector![0.5, 0.5]);
    assert_eq!(folds.len(), 1);
    assert!(same_line(&folds[0], &Line::from_unit(vector![1.0, 0.0], 0.5)));

    // Circle tangent to the left edge: one image, the foot of p2.
    let p1 = vector![0.5, 0.0];
    let folds = axiom5(&paper, p1, &left, vector![0.5, 0.5]);
    assert_eq!(folds.len(), 1);
    assert!(folds[0].contains(vector![0.5, 0.5], 1e-12));
    assert!((folds[0].reflect(p1) - vector![0.0, 0.5]).norm() < 1e-12);

    // Circle too small to reach the right edge.
    let right = paper.edge(Edge::Right);
    assert!(axiom5(&paper, vector![0.1, 0.5], &right, vector![0.2, 0.5]).is_empty());

    let mut rng = StdRng::seed_from_u64(23);
    for _ in 0..200 {
        let (p1, p2) = (sample_point(&mut rng), sample_point(&mut rng));
        let line = paper.edge(Edge::ALL[rng.gen_range(0..4)]);
        for fold in axiom5(&paper, p1, &line, p2) {
            assert!(fold.contains(p2, 1e-9));
            assert!(line.distance_to(fold.reflect(p1)) < 1e-9);
            assert!(paper.contains(&fold));
        }
    }
}

#[test]
fn axiom6_known_solution() {
    let paper = unit();
    let right = paper.edge(Edge::Right);
    let x08 = Line::from_unit(vector![1.0, 0.0], 0.8);
    let folds = axiom6(
        &paper,
        vector![0.0, 0.3],
        &right,
        vector![0.2, 0.7],
        &x08,
        DEFAULT_FIT_EPS,
    );
    assert_eq!(folds.len(), 1);
    assert!(same_line(&folds[0], &Line::from_unit(vector![1.0, 0.0], 0.5)));
}

#[test]
fn axiom6_solutions_carry_both_points() {
    let paper = unit();
    let mut rng = StdRng::seed_from_u64(31);
    let mut found = 0;
    for _ in 0..300 {
        let (p1, p2) = (sample_point(&mut rng), sample_point(&mut rng));
        let Some(line1) = Line::through(sample_point(&mut rng), sample_point(&mut rng)) else {
            continue;
        };
        let line2 = paper.edge(Edge::ALL[rng.gen_range(0..4)]);
        for fold in axiom6(&paper, p1, &line1, p2, &line2, DEFAULT_FIT_EPS) {
            found += 1;
            assert!(line1.distance_to(fold.reflect(p1)) < DEFAULT_FIT_EPS);
            assert!(line2.distance_to(fold.reflect(p2)) < DEFAULT_FIT_EPS);
            assert!(paper.encloses(fold.reflect(p2)));
        }
    }
    assert!(found > 0);
}

#[test]
fn axiom7_closed_form() {
    let paper = unit();
    let right = paper.edge(Edge::Right);
    let bottom = paper.edge(Edge::Bottom);
    let fold = axiom7(&paper, vector![0.2, 0.3], &right, &bottom).unwrap();
    assert!(same_line(&fold, &Line::from_unit(vector![1.0, 0.0], 0.6)));
    assert!((fold.reflect(vector![0.2, 0.3]) - vector![1.0, 0.3]).norm() < 1e-12);

    // Perpendicular to the left edge means parallel to the right edge.
    assert!(axiom7(&paper, vector![0.2, 0.3], &right, &paper.edge(Edge::Left)).is_none());
}
