//! Nearest-reference queries against a finished closure.
//!
//! Matching records each candidate's error on the reference itself, then
//! returns the qualifying references sorted by error (then rank) and capped
//! at `max_matches`.

use nalgebra::Vector2;

use crate::geom2::Line;
use crate::refs::{LineId, PointId};

use super::Closure;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointMatch {
    pub id: PointId,
    pub point: Vector2<f64>,
    pub rank: usize,
    pub distance_error: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineMatch {
    pub id: LineId,
    pub line: Line,
    pub rank: usize,
    pub shift_error: f64,
    /// Degrees.
    pub angle_error: f64,
}

impl Closure {
    /// Points within `max_distance_error` of `target`, best first.
    pub fn match_points(&mut self, target: Vector2<f64>) -> Vec<PointMatch> {
        let tol = self.config.tolerances;
        let ids: Vec<PointId> = self.store.point_ids().collect();
        let mut found = Vec::new();
        for id in ids {
            let r = self.store.point_mut(id);
            let error = (target - r.point).norm();
            if error <= tol.max_distance_error {
                r.distance_error = error;
                found.push(PointMatch {
                    id,
                    point: r.point,
                    rank: r.rank,
                    distance_error: error,
                });
            }
        }
        found.sort_by(|a, b| {
            a.distance_error
                .total_cmp(&b.distance_error)
                .then(a.rank.cmp(&b.rank))
        });
        found.truncate(tol.max_matches);
        found
    }

    /// Lines within `max_shift_error` and `max_angle_error` of `target`.
    ///
    /// The comparison is undirected: a line matches its own reverse. Results
    /// are ordered by shift, then angle, then rank.
    pub fn match_lines(&mut self, target: &Line) -> Vec<LineMatch> {
        let tol = self.config.tolerances;
        let ids: Vec<LineId> = self.store.line_ids().collect();
        let mut found = Vec::new();
        for id in ids {
            let r = self.store.line_mut(id);
            let (shift, angle) = target.error_against(&r.line);
            if shift <= tol.max_shift_error && angle <= tol.max_angle_error {
                r.shift_error = shift;
                r.angle_error = angle;
                found.push(LineMatch {
                    id,
                    line: r.line,
                    rank: r.rank,
                    shift_error: shift,
                    angle_error: angle,
                });
            }
        }
        found.sort_by(|a, b| {
            a.shift_error
                .total_cmp(&b.shift_error)
                .then(a.angle_error.total_cmp(&b.angle_error))
                .then(a.rank.cmp(&b.rank))
        });
        found.truncate(tol.max_matches);
        found
    }
}
