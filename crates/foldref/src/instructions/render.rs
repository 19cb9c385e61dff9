//! Resolve diagram ids into plain, serializable geometry for a renderer.

use nalgebra::Vector2;
use serde::Serialize;

use crate::refs::{LineId, RefStore};

use super::{Arrow, Diagram, Step};

type Xy = [f64; 2];

fn xy(v: Vector2<f64>) -> Xy {
    [v.x, v.y]
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderedPoint {
    pub label: String,
    pub at: Xy,
}

/// A reference line, clipped to the sheet.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderedLine {
    pub label: String,
    pub equation: String,
    /// `None` if the line misses the sheet.
    pub segment: Option<[Xy; 2]>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderedArrow {
    pub begin: Xy,
    pub end: Xy,
    pub control: Xy,
    pub radius: f64,
    pub width: f64,
    pub height: f64,
    pub head: [Xy; 3],
    pub tail: [Xy; 3],
}

impl From<&Arrow> for RenderedArrow {
    fn from(a: &Arrow) -> Self {
        Self {
            begin: xy(a.begin),
            end: xy(a.end),
            control: xy(a.control),
            radius: a.radius,
            width: a.width,
            height: a.height,
            head: a.head().map(xy),
            tail: a.tail().map(xy),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderedDiagram {
    pub width: f64,
    pub height: f64,
    pub fold: Option<RenderedLine>,
    pub creases: Vec<RenderedLine>,
    pub points: Vec<RenderedPoint>,
    pub lines: Vec<RenderedLine>,
    pub arrows: Vec<RenderedArrow>,
    /// Detected segments, drawn as an overlay only.
    pub line_segments: Vec<[Xy; 2]>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderedStep {
    pub text: String,
    pub diagram: RenderedDiagram,
}

fn render_line(store: &RefStore, id: LineId) -> RenderedLine {
    let r = store.line(id);
    RenderedLine {
        label: r.describe(),
        equation: r.line.to_string(),
        segment: store.paper().clip(&r.line).map(|(a, b)| [xy(a), xy(b)]),
    }
}

pub fn render(store: &RefStore, diagram: &Diagram) -> RenderedDiagram {
    let paper = store.paper();
    RenderedDiagram {
        width: paper.width(),
        height: paper.height(),
        fold: diagram.fold.map(|id| render_line(store, id)),
        creases: diagram.creases.iter().map(|&id| render_line(store, id)).collect(),
        points: diagram
            .points
            .iter()
            .map(|&id| {
                let r = store.point(id);
                RenderedPoint {
                    label: r.describe(),
                    at: xy(r.point),
                }
            })
            .collect(),
        lines: diagram.lines.iter().map(|&id| render_line(store, id)).collect(),
        arrows: diagram.arrows.iter().map(RenderedArrow::from).collect(),
        line_segments: diagram
            .line_segments
            .iter()
            .map(|s| [xy(s.start), xy(s.end)])
            .collect(),
    }
}

pub fn render_steps(store: &RefStore, steps: &[Step]) -> Vec<RenderedStep> {
    steps
        .iter()
        .map(|s| RenderedStep {
            text: s.text.clone(),
            diagram: render(store, &s.diagram),
        })
        .collect()
}
