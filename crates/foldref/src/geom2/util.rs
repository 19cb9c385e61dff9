use nalgebra::Vector2;

use super::types::Line;

/// Rotate `v` by 90° counterclockwise about the origin.
#[inline]
pub fn rot90(v: Vector2<f64>) -> Vector2<f64> {
    Vector2::new(-v.y, v.x)
}

/// Rotate `v` counterclockwise about the origin; `angle` in radians.
#[inline]
pub fn rotated(v: Vector2<f64>, angle: f64) -> Vector2<f64> {
    let (sn, cs) = angle.sin_cos();
    Vector2::new(v.x * cs - v.y * sn, v.x * sn + v.y * cs)
}

/// Unit vector along `v`, or `None` for a zero/non-finite input.
#[inline]
pub fn normalized(v: Vector2<f64>) -> Option<Vector2<f64>> {
    let norm = v.norm();
    if !norm.is_finite() || norm <= 0.0 {
        return None;
    }
    Some(v / norm)
}

#[inline]
pub fn midpoint(a: Vector2<f64>, b: Vector2<f64>) -> Vector2<f64> {
    (a + b) * 0.5
}

/// Intersection of two lines; `None` when they are parallel within `eps`.
pub fn intersection(first: &Line, second: &Line, eps: f64) -> Option<Vector2<f64>> {
    if first.is_parallel(second, eps) {
        return None;
    }
    let (u1, u2) = (first.n, second.n);
    let den = u1.x * u2.y - u1.y * u2.x;
    let x = (first.d * u2.y - second.d * u1.y) / den;
    let y = (second.d * u1.x - first.d * u2.x) / den;
    Some(Vector2::new(x, y))
}

/// Intersection restricted to lines meeting at `min_angle` degrees or more.
///
/// The angle is undirected (in `[0, 90]`), so nearly parallel lines whose
/// normals point in opposite directions are rejected as well.
pub fn intersection_min_angle(
    first: &Line,
    second: &Line,
    min_angle: f64,
    eps: f64,
) -> Option<Vector2<f64>> {
    if first.angle_deg(second) < min_angle {
        return None;
    }
    intersection(first, second, eps)
}

/// Format a coordinate for instruction text: near-zero values print as `0`,
/// others with at most six decimals and no trailing zeros.
pub fn fmt_num(v: f64, eps: f64) -> String {
    if v.abs() < eps {
        return "0".to_string();
    }
    let s = format!("{v:.6}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// Format a point as `(x, y)`.
pub fn fmt_point(p: Vector2<f64>, eps: f64) -> String {
    format!("({}, {})", fmt_num(p.x, eps), fmt_num(p.y, eps))
}
