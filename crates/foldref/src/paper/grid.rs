//! Bucketed identity for points and lines.
//!
//! Two geometric values that quantize to the same key are the same reference.
//! Keys are plain integers, so they hash and compare exactly; the tolerance
//! lives entirely in the quantization.
//!
//! Trade-off: values straddling a bucket boundary get different keys even if
//! they are numerically closer than values that share a bucket, and two
//! distinct lines closer than one cell merge into one. Both are accepted.

use std::f64::consts::TAU;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::geom2::Line;

/// Identity key of a point: `(column, row)` cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointKey(pub i64, pub i64);

/// Identity key of a line: `(angle cell, distance cell)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineKey(pub i64, pub i64);

/// Grid resolution used for bucketing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridRes {
    /// Horizontal partitions over the paper width.
    pub num_x: u32,
    /// Vertical partitions over the paper height.
    pub num_y: u32,
    /// Distance partitions over the paper diagonal.
    pub num_radius: u32,
    /// Angle partitions over a full turn.
    pub num_angle: u32,
}

impl Default for GridRes {
    fn default() -> Self {
        Self {
            num_x: 5000,
            num_y: 5000,
            num_radius: 5000,
            num_angle: 5000,
        }
    }
}

/// Grid scaled to one paper rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Grid {
    pub res: GridRes,
    origin: Vector2<f64>,
    width: f64,
    height: f64,
    diagonal: f64,
}

#[inline]
fn cell(f: f64, n: u32) -> i64 {
    (0.5 + f * f64::from(n)).floor() as i64
}

impl Grid {
    pub fn new(res: GridRes, origin: Vector2<f64>, width: f64, height: f64) -> Self {
        Self {
            res,
            origin,
            width,
            height,
            diagonal: width.hypot(height),
        }
    }

    pub fn point_key(&self, p: Vector2<f64>) -> PointKey {
        let fx = (p.x - self.origin.x) / self.width;
        let fy = (p.y - self.origin.y) / self.height;
        PointKey(cell(fx, self.res.num_x), cell(fy, self.res.num_y))
    }

    /// Angle cells wrap around, and lines in the zero-distance cell map `θ`
    /// and `θ + π` to the same key (their normal sign is arbitrary).
    pub fn line_key(&self, line: &Line) -> LineKey {
        let nd = cell(line.d / self.diagonal, self.res.num_radius);
        let mut fa = (line.n.y.atan2(line.n.x) / TAU).rem_euclid(1.0);
        if nd == 0 {
            fa = (2.0 * fa).rem_euclid(1.0);
        }
        let na = cell(fa, self.res.num_angle).rem_euclid(i64::from(self.res.num_angle.max(1)));
        LineKey(na, nd)
    }
}
