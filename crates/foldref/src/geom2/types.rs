//! Lines in canonical normal form.
//!
//! - `Line`: `n · p = d` with unit `n` and `d >= 0`.
//! - Error metric between lines used by target matching.

use std::fmt;

use nalgebra::Vector2;

use super::util::{fmt_num, normalized, rot90};

/// Tolerance used when printing equations.
const DISPLAY_EPS: f64 = 1e-8;

/// Line `n · p = d` in canonical normal form.
///
/// Invariants:
/// - `||n|| = 1`.
/// - `d >= 0`. Constructors negate both fields when the offset would be
///   negative, which removes the `line` / `-line` ambiguity. Lines through the
///   origin keep the normal they were built with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    pub n: Vector2<f64>,
    pub d: f64,
}

impl Line {
    /// From an offset and a normal that is already unit length.
    #[inline]
    pub fn from_unit(n: Vector2<f64>, d: f64) -> Self {
        if d < 0.0 {
            Self { n: -n, d: -d }
        } else {
            Self { n, d }
        }
    }

    /// From an offset and an arbitrary normal; `None` if the normal is zero.
    ///
    /// `d` is interpreted against the normalized normal.
    #[inline]
    pub fn from_normal(n: Vector2<f64>, d: f64) -> Option<Self> {
        normalized(n).map(|u| Self::from_unit(u, d))
    }

    /// Line through `p` with unit normal `n`.
    #[inline]
    pub fn through_point_unit(p: Vector2<f64>, n: Vector2<f64>) -> Self {
        Self::from_unit(n, n.dot(&p))
    }

    /// Line through `p` with an arbitrary normal; `None` if the normal is zero.
    #[inline]
    pub fn through_point(p: Vector2<f64>, n: Vector2<f64>) -> Option<Self> {
        normalized(n).map(|u| Self::through_point_unit(p, u))
    }

    /// Line through two points; `None` if they coincide.
    pub fn through(p: Vector2<f64>, q: Vector2<f64>) -> Option<Self> {
        let dir = normalized(p - q)?;
        Some(Self::through_point_unit(p, rot90(dir)))
    }

    /// Unit direction vector (normal rotated by 90°).
    #[inline]
    pub fn direction(&self) -> Vector2<f64> {
        rot90(self.n)
    }

    /// `d - n·p`: zero on the line; the sign tells which side `p` is on.
    #[inline]
    pub fn signed_offset(&self, p: Vector2<f64>) -> f64 {
        self.d - self.n.dot(&p)
    }

    #[inline]
    pub fn distance_to(&self, p: Vector2<f64>) -> f64 {
        self.signed_offset(p).abs()
    }

    #[inline]
    pub fn contains(&self, p: Vector2<f64>, eps: f64) -> bool {
        self.distance_to(p) < eps
    }

    #[inline]
    pub fn reflect(&self, p: Vector2<f64>) -> Vector2<f64> {
        p + self.n * (2.0 * self.signed_offset(p))
    }

    #[inline]
    pub fn project(&self, p: Vector2<f64>) -> Vector2<f64> {
        p + self.n * self.signed_offset(p)
    }

    #[inline]
    pub fn is_parallel(&self, other: &Line, eps: f64) -> bool {
        self.n.dot(&rot90(other.n)).abs() < eps
    }

    /// `y` on the line at abscissa `x`; `None` for vertical lines.
    pub fn y_at(&self, x: f64) -> Option<f64> {
        if self.n.y == 0.0 {
            return None;
        }
        Some((self.d - x * self.n.x) / self.n.y)
    }

    /// `x` on the line at ordinate `y`; `None` for horizontal lines.
    pub fn x_at(&self, y: f64) -> Option<f64> {
        if self.n.x == 0.0 {
            return None;
        }
        Some((self.d - y * self.n.y) / self.n.x)
    }

    /// Undirected angle between two lines in degrees, in `[0, 90]`.
    pub fn angle_deg(&self, other: &Line) -> f64 {
        let cross = self.n.x * other.n.y - self.n.y * other.n.x;
        cross.abs().atan2(self.n.dot(&other.n).abs()).to_degrees()
    }

    /// `(shift, angle)` error of `other` measured against `self`.
    ///
    /// The normals are aligned before comparing, so a line and its reflection
    /// through the origin compare as equal.
    pub fn error_against(&self, other: &Line) -> (f64, f64) {
        let (n2, d2) = if self.n.dot(&other.n) < 0.0 {
            (-other.n, -other.d)
        } else {
            (other.n, other.d)
        };
        let shift = (self.d - self.n.dot(&n2) * d2).abs();
        (shift, self.angle_deg(other))
    }
}

impl fmt::Display for Line {
    /// Equation form: `x = c`, `y = c`, or `y = mx + c`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.n.y.abs() < DISPLAY_EPS {
            let c = self.d / self.n.x;
            return write!(f, "x = {}", fmt_num(c, DISPLAY_EPS));
        }
        let c = self.d / self.n.y;
        let m = -self.n.x / self.n.y;
        if m.abs() < DISPLAY_EPS {
            return write!(f, "y = {}", fmt_num(c, DISPLAY_EPS));
        }
        let slope = fmt_num(m, DISPLAY_EPS);
        if c.abs() < DISPLAY_EPS {
            write!(f, "y = {slope}x")
        } else if c < 0.0 {
            write!(f, "y = {slope}x - {}", fmt_num(-c, DISPLAY_EPS))
        } else {
            write!(f, "y = {slope}x + {}", fmt_num(c, DISPLAY_EPS))
        }
    }
}
