//! Huzita–Justin fold constructors.
//!
//! Each solver takes raw geometry plus the sheet and returns the candidate
//! folds that survive validation: a candidate must cross the sheet without
//! leaving a skinny flap (`Paper::contains`), and any point the fold moves
//! must land on the sheet. Degenerate configurations (parallel lines where an
//! intersection is needed, tangency failures, coincident points) yield no
//! candidates; nothing here fails.
//!
//! Inputs are assumed distinct; the closure engine filters identical and
//! incident inputs before calling in.

mod cubic;

pub use cubic::solve_cubic;

use nalgebra::Vector2;

use crate::geom2::{intersection, midpoint, normalized, rot90, Line};
use crate::paper::Paper;

/// Tolerance for the consistency check on axiom 6 solutions.
pub const DEFAULT_FIT_EPS: f64 = 1e-6;

/// Perpendicular bisector of `p1 p2`, without validation; `None` if they coincide.
pub fn perpendicular_bisector(p1: Vector2<f64>, p2: Vector2<f64>) -> Option<Line> {
    Line::through_point(midpoint(p1, p2), p1 - p2)
}

/// Axiom 1: fold through `p1` and `p2`.
pub fn axiom1(paper: &Paper, p1: Vector2<f64>, p2: Vector2<f64>) -> Option<Line> {
    Line::through(p1, p2).filter(|fold| paper.contains(fold))
}

/// Axiom 2: fold `p1` onto `p2`.
pub fn axiom2(paper: &Paper, p1: Vector2<f64>, p2: Vector2<f64>) -> Option<Line> {
    perpendicular_bisector(p1, p2).filter(|fold| paper.contains(fold))
}

/// Axiom 3: fold `line1` onto `line2`.
///
/// Parallel lines give the single line midway between them; otherwise the two
/// angle bisectors through their intersection are validated independently.
pub fn axiom3(paper: &Paper, line1: &Line, line2: &Line) -> Vec<Line> {
    let mut folds = Vec::with_capacity(2);
    let Some(p) = intersection(line1, line2, paper.eps) else {
        // Align the normals first; parallel lines on opposite sides of the
        // origin carry opposite canonical normals.
        let (n2, d2) = if line1.n.dot(&line2.n) < 0.0 {
            (-line2.n, -line2.d)
        } else {
            (line2.n, line2.d)
        };
        let n = normalized(line1.n + n2).unwrap_or(line1.n);
        let fold = Line::from_unit(n, 0.5 * (line1.d + d2));
        if paper.contains(&fold) {
            folds.push(fold);
        }
        return folds;
    };
    let Some(dir) = normalized(line1.n + line2.n) else {
        return folds;
    };
    for n in [dir, rot90(dir)] {
        let fold = Line::through_point_unit(p, n);
        if paper.contains(&fold) {
            folds.push(fold);
        }
    }
    folds
}

/// Axiom 4: fold through `p` perpendicular to `line`.
///
/// Only valid when the foot of the perpendicular lies on the sheet.
pub fn axiom4(paper: &Paper, p: Vector2<f64>, line: &Line) -> Option<Line> {
    if !paper.encloses(line.project(p)) {
        return None;
    }
    let fold = Line::through_point_unit(p, line.direction());
    paper.contains(&fold).then_some(fold)
}

/// Axiom 5: fold `p1` onto `line` with the fold passing through `p2`.
///
/// The image of `p1` lies on the circle around `p2` with radius `|p1 − p2|`;
/// each circle/line intersection on the sheet gives the fold through `p2`
/// and the midpoint of `p1` and that intersection.
pub fn axiom5(paper: &Paper, p1: Vector2<f64>, line: &Line, p2: Vector2<f64>) -> Vec<Line> {
    let radius = (p1 - p2).norm();
    let to_line = line.n * line.signed_offset(p2);
    let reach = to_line.norm();
    if radius < reach {
        return Vec::new();
    }
    let images = if radius - reach < paper.eps {
        vec![p2 + to_line]
    } else {
        let half_chord = line.direction() * (radius * radius - reach * reach).sqrt();
        vec![p2 + to_line + half_chord, p2 + to_line - half_chord]
    };
    let mut folds = Vec::with_capacity(images.len());
    for image in images {
        if !paper.encloses(image) {
            continue;
        }
        let mid = midpoint(p1, image);
        if paper.point_key(mid) == paper.point_key(p2) {
            continue;
        }
        if let Some(fold) = Line::through(p2, mid).filter(|f| paper.contains(f)) {
            folds.push(fold);
        }
    }
    folds
}

/// Axiom 6: fold `p1` onto `line1` and `p2` onto `line2` simultaneously.
///
/// In coordinates where `line1` is the x-axis and `p1` sits on the y-axis,
/// the image of `p1` is `(t, 0)` and `t` solves a cubic whose coefficients
/// come from the transformed `p2` and `line2`. Every real root is turned
/// back into a fold and checked: it must move `p1`, keep both images on the
/// sheet, be a valid fold, and actually carry each point onto its line.
pub fn axiom6(
    paper: &Paper,
    p1: Vector2<f64>,
    line1: &Line,
    p2: Vector2<f64>,
    line2: &Line,
    fit_eps: f64,
) -> Vec<Line> {
    let u1 = line1.n;
    let u2 = line2.n;
    let u1p = -rot90(u1);
    let base = u1 * line1.d;
    let v1 = p1 - base;
    let v2 = p2 - base;
    let x1 = v1.dot(&u1p);
    let x2 = v2.dot(&u1p) - x1;
    let y1 = v1.dot(&u1);
    let y2 = v2.dot(&u1);
    let u2x = u2.dot(&u1p);
    let u2y = u2.dot(&u1);
    let d2 = line2.d - u2.dot(&base) - u2x * x1;
    let yy = 2.0 * y2 - y1;
    let z = d2 - u2x * x2 - u2y * y2;

    let a = u2x;
    let b = -(2.0 * u2x * x2 + u2y * y1 + z);
    let c = y1 * (2.0 * u2y * x2 + u2x * yy);
    let d = -y1 * y1 * (u2y * yy + z);

    let mut folds = Vec::new();
    for t in solve_cubic(a, b, c, d, paper.eps) {
        let p1_image = base + u1p * (t + x1);
        if paper.point_key(p1_image) == paper.point_key(p1) || !paper.encloses(p1_image) {
            continue;
        }
        let Some(fold) = Line::through_point(midpoint(p1, p1_image), p1 - p1_image) else {
            continue;
        };
        if !paper.contains(&fold) {
            continue;
        }
        let p2_image = fold.reflect(p2);
        let consistent =
            line1.distance_to(fold.reflect(p1)) < fit_eps && line2.distance_to(p2_image) < fit_eps;
        if !consistent || !paper.encloses(p2_image) {
            continue;
        }
        folds.push(fold);
    }
    folds
}

/// Axiom 7: fold `p` onto `line1` with the fold perpendicular to `line2`.
pub fn axiom7(paper: &Paper, p: Vector2<f64>, line1: &Line, line2: &Line) -> Option<Line> {
    let u1 = line1.n;
    let n = line2.direction();
    let slant = n.dot(&u1);
    if slant.abs() < paper.eps {
        return None;
    }
    let offset = line1.signed_offset(p) / (2.0 * slant) + p.dot(&n);
    let fold = Line::from_unit(n, offset);
    (paper.encloses(fold.reflect(p)) && paper.contains(&fold)).then_some(fold)
}

#[cfg(test)]
mod tests;
