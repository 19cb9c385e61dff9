//! The rectangular sheet: seeds, containment, clipping, and fold validity.
//!
//! Purpose
//! - Expose the 4 corners and 4 edges that seed rank 0.
//! - Decide whether a candidate fold is usable: it must cross the sheet and
//!   must not leave a skinny flap (a piece whose bounding box is too
//!   elongated).
//! - Own the bucket grid, since identity is scaled to the sheet's size.

mod grid;

pub use grid::{Grid, GridRes, LineKey, PointKey};

use nalgebra::Vector2;

use crate::geom2::{intersection, midpoint, rot90, Line};

/// Corners of the sheet, in seeding order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Corner {
    BottomLeft,
    BottomRight,
    TopLeft,
    TopRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::BottomLeft,
        Corner::BottomRight,
        Corner::TopLeft,
        Corner::TopRight,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Corner::BottomLeft => "the bottom left corner",
            Corner::BottomRight => "the bottom right corner",
            Corner::TopLeft => "the top left corner",
            Corner::TopRight => "the top right corner",
        }
    }

    /// The two edges meeting at this corner (vertical edge first).
    pub fn edges(self) -> (Edge, Edge) {
        match self {
            Corner::BottomLeft => (Edge::Left, Edge::Bottom),
            Corner::BottomRight => (Edge::Right, Edge::Bottom),
            Corner::TopLeft => (Edge::Left, Edge::Top),
            Corner::TopRight => (Edge::Right, Edge::Top),
        }
    }
}

/// Edges of the sheet, in seeding order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Edge {
    Left,
    Bottom,
    Right,
    Top,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Left, Edge::Bottom, Edge::Right, Edge::Top];

    pub fn name(self) -> &'static str {
        match self {
            Edge::Left => "the left edge",
            Edge::Bottom => "the bottom edge",
            Edge::Right => "the right edge",
            Edge::Top => "the top edge",
        }
    }
}

/// Axis-aligned box grown point by point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Vector2<f64>,
    pub max: Vector2<f64>,
}

impl Bounds {
    pub fn of(points: &[Vector2<f64>]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut b = Bounds {
            min: *first,
            max: *first,
        };
        for p in rest {
            b = b.including(*p);
        }
        Some(b)
    }

    pub fn including(self, p: Vector2<f64>) -> Self {
        Bounds {
            min: self.min.inf(&p),
            max: self.max.sup(&p),
        }
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Long side over short side (always ≥ 1); infinite for a degenerate box.
    pub fn aspect_ratio(&self) -> f64 {
        let (w, h) = (self.width(), self.height());
        let short = w.min(h);
        if short <= 0.0 {
            return f64::INFINITY;
        }
        w.max(h) / short
    }
}

/// The sheet `[bottom_left, top_right]` plus the tolerances its predicates use.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Paper {
    pub bottom_left: Vector2<f64>,
    pub top_right: Vector2<f64>,
    /// Slack for containment and parallelism tests.
    pub eps: f64,
    /// Folds leaving a flap more elongated than this are rejected.
    pub max_aspect_ratio: f64,
    pub grid: Grid,
}

impl Paper {
    pub const DEFAULT_EPS: f64 = 1e-8;
    pub const DEFAULT_MAX_ASPECT_RATIO: f64 = 10.0;

    /// `width × height` sheet with its bottom-left corner at the origin.
    pub fn new(width: f64, height: f64) -> Self {
        Self::with_tolerances(
            width,
            height,
            Self::DEFAULT_EPS,
            Self::DEFAULT_MAX_ASPECT_RATIO,
            GridRes::default(),
        )
    }

    pub fn with_tolerances(
        width: f64,
        height: f64,
        eps: f64,
        max_aspect_ratio: f64,
        res: GridRes,
    ) -> Self {
        let bottom_left = Vector2::zeros();
        Self {
            bottom_left,
            top_right: Vector2::new(width, height),
            eps,
            max_aspect_ratio,
            grid: Grid::new(res, bottom_left, width, height),
        }
    }

    pub fn width(&self) -> f64 {
        self.top_right.x - self.bottom_left.x
    }

    pub fn height(&self) -> f64 {
        self.top_right.y - self.bottom_left.y
    }

    pub fn aspect_ratio(&self) -> f64 {
        Bounds {
            min: self.bottom_left,
            max: self.top_right,
        }
        .aspect_ratio()
    }

    pub fn corner(&self, c: Corner) -> Vector2<f64> {
        let (bl, tr) = (self.bottom_left, self.top_right);
        match c {
            Corner::BottomLeft => bl,
            Corner::BottomRight => Vector2::new(tr.x, bl.y),
            Corner::TopLeft => Vector2::new(bl.x, tr.y),
            Corner::TopRight => tr,
        }
    }

    pub fn edge(&self, e: Edge) -> Line {
        let (ex, ey) = (Vector2::new(1.0, 0.0), Vector2::new(0.0, 1.0));
        match e {
            Edge::Left => Line::from_unit(ex, self.bottom_left.x),
            Edge::Bottom => Line::from_unit(ey, self.bottom_left.y),
            Edge::Right => Line::from_unit(ex, self.top_right.x),
            Edge::Top => Line::from_unit(ey, self.top_right.y),
        }
    }

    #[inline]
    pub fn point_key(&self, p: Vector2<f64>) -> PointKey {
        self.grid.point_key(p)
    }

    #[inline]
    pub fn line_key(&self, l: &Line) -> LineKey {
        self.grid.line_key(l)
    }

    pub fn encloses(&self, p: Vector2<f64>) -> bool {
        self.encloses_x(p.x) && self.encloses_y(p.y)
    }

    pub fn encloses_x(&self, x: f64) -> bool {
        self.bottom_left.x - self.eps <= x && x <= self.top_right.x + self.eps
    }

    pub fn encloses_y(&self, y: f64) -> bool {
        self.bottom_left.y - self.eps <= y && y <= self.top_right.y + self.eps
    }

    /// The two points where `line` crosses the boundary, or `None` if it
    /// misses the sheet (or only touches a corner).
    pub fn clip(&self, line: &Line) -> Option<(Vector2<f64>, Vector2<f64>)> {
        let mut hits: Vec<(PointKey, Vector2<f64>)> = Vec::with_capacity(4);
        for e in Edge::ALL {
            let Some(p) = intersection(line, &self.edge(e), self.eps) else {
                continue;
            };
            let within = match e {
                Edge::Left | Edge::Right => self.encloses_y(p.y),
                Edge::Bottom | Edge::Top => self.encloses_x(p.x),
            };
            if !within {
                continue;
            }
            let key = self.point_key(p);
            if hits.iter().all(|(k, _)| *k != key) {
                hits.push((key, p));
            }
        }
        if hits.len() < 2 {
            return None;
        }
        Some((hits[0].1, hits[1].1))
    }

    /// True if either piece cut off by `line` is a skinny flap.
    ///
    /// The clipped crease and its perpendicular bisector split the sheet into
    /// two triangles `(p1, p2, b_k)`; each triangle's bounding box must stay
    /// within `max_aspect_ratio`.
    pub fn makes_skinny_flap(&self, line: &Line) -> bool {
        let Some((p1, p2)) = self.clip(line) else {
            return true;
        };
        let bisector = Line::through_point_unit(midpoint(p1, p2), rot90(line.n));
        let Some((b1, b2)) = self.clip(&bisector) else {
            return true;
        };
        [b1, b2].iter().any(|&b| {
            Bounds::of(&[p1, p2, b])
                .map(|bb| bb.aspect_ratio() > self.max_aspect_ratio)
                .unwrap_or(true)
        })
    }

    /// A fold is valid if it crosses the sheet without leaving a skinny flap.
    #[inline]
    pub fn contains(&self, line: &Line) -> bool {
        !self.makes_skinny_flap(line)
    }
}
