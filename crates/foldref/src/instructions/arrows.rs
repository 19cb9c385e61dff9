//! Motion arrows drawn on fold diagrams.
//!
//! An arrow is an arc from `begin` to `end` whose control point sits off the
//! chord so the arc subtends 60°. Head and tail are small triangles sized
//! from the sheet, shrunk for very short arrows.

use nalgebra::Vector2;

use crate::axioms::perpendicular_bisector;
use crate::geom2::{midpoint, normalized, rot90, Line};
use crate::paper::Paper;
use crate::refs::{Axiom, RefStore};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arrow {
    pub begin: Vector2<f64>,
    pub end: Vector2<f64>,
    pub control: Vector2<f64>,
    pub radius: f64,
    pub width: f64,
    pub height: f64,
}

impl Arrow {
    pub fn new(paper: &Paper, begin: Vector2<f64>, end: Vector2<f64>) -> Self {
        let chord = end - begin;
        let radius = chord.norm();
        let control = ((begin + end) + rot90(chord) / 3f64.sqrt()) / 2.0;
        let min_side = paper.width().min(paper.height());
        let width = if radius < min_side / 6.0 {
            radius / 6.0
        } else {
            0.045 * min_side
        };
        Self {
            begin,
            end,
            control,
            radius,
            width,
            height: 1.6 * width,
        }
    }

    /// Triangle at `end`: two base corners, then the tip.
    pub fn head(&self) -> [Vector2<f64>; 3] {
        self.triangle(self.end)
    }

    /// Triangle at `begin`: two base corners, then the tip.
    pub fn tail(&self) -> [Vector2<f64>; 3] {
        self.triangle(self.begin)
    }

    fn triangle(&self, tip: Vector2<f64>) -> [Vector2<f64>; 3] {
        let Some(tangent) = normalized(self.control - tip) else {
            return [tip; 3];
        };
        let side = rot90(tangent) * (self.width / 2.0);
        let base = tip + tangent * self.height;
        [base + side, base - side, tip]
    }
}

/// Clip point of `guide` nearer to `fold`, and the arrow to its reflection.
fn nearer_clip_arrow(paper: &Paper, fold: &Line, guide: &Line) -> Option<Arrow> {
    let (a, b) = paper.clip(guide)?;
    let start = if fold.distance_to(a) < fold.distance_to(b) {
        a
    } else {
        b
    };
    Some(Arrow::new(paper, start, fold.reflect(start)))
}

/// Representative point of the part of `line1` and `line2` that lands on
/// each other when folding along `fold`.
fn overlap_point(paper: &Paper, fold: &Line, line1: &Line, line2: &Line) -> Option<Vector2<f64>> {
    let (a1, b1) = paper.clip(line1)?;
    let (a2, b2) = paper.clip(line2)?;
    let keep = |ends: [Vector2<f64>; 2]| -> Vec<(Vector2<f64>, Vector2<f64>)> {
        ends.into_iter()
            .map(|p| (p, fold.reflect(p)))
            .filter(|&(_, r)| paper.encloses(r))
            .collect()
    };
    let valid1 = keep([a1, b1]);
    let valid2 = keep([a2, b2]);
    if valid1.len() == 2 {
        // `line1` folds entirely onto `line2`.
        return Some(midpoint(a1, b1));
    }
    if valid2.len() == 2 {
        return Some(midpoint(a2, b2));
    }
    match (valid1.first(), valid2.first()) {
        (Some(&(p1, _)), Some(&(_, r2))) => Some(midpoint(p1, r2)),
        _ => None,
    }
}

/// Arrows for the fold `fold` produced by `axiom`.
pub(super) fn fold_arrows(store: &RefStore, fold: &Line, axiom: &Axiom) -> Vec<Arrow> {
    let paper = store.paper();
    let pt = |id| store.point(id).point;
    let ln = |id| store.line(id).line;
    let reflect_arrow = |p: Vector2<f64>| Arrow::new(paper, p, fold.reflect(p));
    match *axiom {
        Axiom::A1(p1, p2) => perpendicular_bisector(pt(p1), pt(p2))
            .and_then(|guide| nearer_clip_arrow(paper, fold, &guide))
            .into_iter()
            .collect(),
        Axiom::A2(p1, p2) => vec![Arrow::new(paper, pt(p1), pt(p2))],
        Axiom::A3(l1, l2) => overlap_point(paper, fold, &ln(l1), &ln(l2))
            .map(reflect_arrow)
            .into_iter()
            .collect(),
        Axiom::A4(_, l) => nearer_clip_arrow(paper, fold, &ln(l)).into_iter().collect(),
        Axiom::A5(p1, _, _) | Axiom::A7(p1, _, _) => vec![reflect_arrow(pt(p1))],
        Axiom::A6(p1, _, p2, _) => {
            let (q1, q2) = (pt(p1), pt(p2));
            let same_side = fold.signed_offset(q1) * fold.signed_offset(q2) > 0.0;
            let second = if same_side {
                Arrow::new(paper, q2, fold.reflect(q2))
            } else {
                Arrow::new(paper, fold.reflect(q2), q2)
            };
            vec![reflect_arrow(q1), second]
        }
    }
}
