//! Fold sequences: from a chosen reference back to the sheet's seeds.
//!
//! Purpose
//! - Walk the provenance DAG of a target reference (explicit stack, two-phase
//!   visit: inputs first, then the reference itself) and emit one `Step` per
//!   derived reference, in an order where every cited label already exists.
//! - Each step carries a `Diagram` snapshot: the active fold, earlier folds as
//!   creases, the step's input points/lines, and arrows showing the motion.
//! - `coalesce` folds standalone intersection steps back into the step that
//!   created one of their lines; `render` resolves ids into plain geometry.
//!
//! Labels
//! - Points take `A, B, …, L` and lines `O, P, …, Z`; after a pool runs dry
//!   the letters repeat with a round suffix (`A2`, `B2`, …).
//! - Seeds keep their names ("the left edge") and never get a step.

mod arrows;
mod builder;
mod coalesce;
mod render;

pub use arrows::Arrow;
pub use builder::build_instructions;
pub use coalesce::coalesce;
pub use render::{
    render, render_steps, RenderedArrow, RenderedDiagram, RenderedLine, RenderedPoint, RenderedStep,
};

use nalgebra::Vector2;

use crate::refs::{LineId, PointId};

/// A plain segment from the image pipeline, drawn as an overlay only.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub start: Vector2<f64>,
    pub end: Vector2<f64>,
}

impl Segment {
    pub fn new(start: Vector2<f64>, end: Vector2<f64>) -> Self {
        Self { start, end }
    }
}

/// Snapshot of the sheet for one step.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Diagram {
    /// The fold made in this step; `None` for intersection steps.
    pub fold: Option<LineId>,
    /// Folds from earlier steps, still visible as creases.
    pub creases: Vec<LineId>,
    pub points: Vec<PointId>,
    pub lines: Vec<LineId>,
    pub arrows: Vec<Arrow>,
    pub line_segments: Vec<Segment>,
}

impl Diagram {
    pub fn is_empty(&self) -> bool {
        self.fold.is_none()
            && self.creases.is_empty()
            && self.points.is_empty()
            && self.lines.is_empty()
            && self.arrows.is_empty()
    }

    fn add_crease(&mut self, id: LineId) {
        if !self.creases.contains(&id) {
            self.creases.push(id);
        }
    }
}

/// One instruction sentence (or several, after coalescing) with its diagram.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Step {
    pub text: String,
    pub diagram: Diagram,
}

/// Letter pool consumed back to front.
#[derive(Clone, Debug)]
struct LabelPool {
    letters: &'static str,
    remaining: Vec<char>,
    round: usize,
}

impl LabelPool {
    const POINTS: &'static str = "LKJIHGFEDCBA";
    const LINES: &'static str = "ZYXWVUTSRQPO";

    fn new(letters: &'static str) -> Self {
        Self {
            letters,
            remaining: letters.chars().collect(),
            round: 1,
        }
    }

    fn points() -> Self {
        Self::new(Self::POINTS)
    }

    fn lines() -> Self {
        Self::new(Self::LINES)
    }

    /// Continue after the first `used` labels of this pool.
    fn skipping(mut self, used: usize) -> Self {
        for _ in 0..used {
            self.next_label();
        }
        self
    }

    fn next_label(&mut self) -> String {
        let c = match self.remaining.pop() {
            Some(c) => c,
            None => {
                self.round += 1;
                self.remaining = self.letters.chars().collect();
                self.remaining.pop().unwrap_or('?')
            }
        };
        if self.round == 1 {
            c.to_string()
        } else {
            format!("{c}{}", self.round)
        }
    }
}
