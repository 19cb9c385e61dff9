//! Real roots of `a x³ + b x² + c x + d = 0`.
//!
//! Degrades to the quadratic/linear formulas when leading coefficients vanish;
//! otherwise uses the reduced form with
//! `q = (3ac − b²)/(9a²)`, `r = (9abc − 27a²d − 2b³)/(54a³)`,
//! `disc = q³ + r²`:
//! - `disc < 0`: three distinct real roots (trigonometric form);
//! - `disc ≈ 0`: repeated roots;
//! - `disc > 0`: one real root (Cardano).

use std::f64::consts::PI;

/// All real roots, unsorted; repeated roots are reported once per branch.
pub fn solve_cubic(a: f64, b: f64, c: f64, d: f64, eps: f64) -> Vec<f64> {
    if a.abs() < eps {
        return solve_quadratic(b, c, d, eps);
    }
    let q = (3.0 * a * c - b * b) / (9.0 * a * a);
    let r = (9.0 * a * b * c - 27.0 * a * a * d - 2.0 * b.powi(3)) / (54.0 * a.powi(3));
    let disc = q.powi(3) + r * r;
    let shift = b / (3.0 * a);

    if disc < 0.0 {
        // q < 0 here, so the square roots are real.
        let theta = (r / (-q.powi(3)).sqrt()).clamp(-1.0, 1.0).acos() / 3.0;
        let e = 2.0 * (-q).sqrt();
        return (0..3)
            .map(|k| e * (theta + 2.0 * PI * f64::from(k) / 3.0).cos() - shift)
            .collect();
    }
    if disc < eps {
        if r.abs() < eps {
            return vec![-shift];
        }
        let e = r.cbrt();
        return vec![2.0 * e - shift, -e - shift];
    }
    let s = disc.sqrt();
    vec![(r + s).cbrt() + (r - s).cbrt() - shift]
}

/// Real roots of `b x² + c x + d = 0` (or the linear/trivial cases).
fn solve_quadratic(b: f64, c: f64, d: f64, eps: f64) -> Vec<f64> {
    if b.abs() < eps {
        if c.abs() < eps {
            return Vec::new();
        }
        return vec![-d / c];
    }
    let disc = c * c - 4.0 * b * d;
    if disc < 0.0 {
        return Vec::new();
    }
    if disc < eps {
        return vec![-c / (2.0 * b)];
    }
    let s = disc.sqrt();
    vec![(-c + s) / (2.0 * b), (-c - s) / (2.0 * b)]
}
