//! 2D geometry primitives (vectors and lines in normal form).
//!
//! Purpose
//! - Vectors are plain `nalgebra::Vector2<f64>`; this module adds the few
//!   helpers the fold solvers need (90° rotation, normalization, midpoints).
//! - `Line` stores the canonical normal form `(n, d)` with `d >= 0`.
//!
//! Conventions
//! - Angles passed to `rotated` are radians; angles between lines are degrees
//!   (they are compared against user-facing tolerances).
//! - Predicates take an explicit `eps`; nothing here reads global state.

mod types;
mod util;

pub use types::Line;
pub use util::{
    fmt_num, fmt_point, intersection, intersection_min_angle, midpoint, normalized, rot90,
    rotated,
};
