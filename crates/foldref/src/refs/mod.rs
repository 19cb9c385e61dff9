//! Reference model: ranked points and lines with provenance.
//!
//! Purpose
//! - `PointRef`/`LineRef` wrap a geometric value with its rank, display label,
//!   matching errors, and origin (seed or derivation).
//! - `RefStore` is the arena that owns every reference of one closure run,
//!   indexed by rank and by bucketed identity key.
//!
//! Invariants
//! - Ids are dense indices into the arena and never reused within a store.
//! - A derived reference only cites references of smaller rank (a point may
//!   cite lines of its own rank), so following origins always terminates at
//!   the seeds.
//! - At most one reference per identity key; the first insertion wins.

use std::collections::HashMap;
use std::fmt;

use nalgebra::Vector2;

use crate::geom2::Line;
use crate::paper::{Corner, Edge, LineKey, Paper, PointKey};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineId(pub usize);

/// Either kind of reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RefId {
    Point(PointId),
    Line(LineId),
}

impl From<PointId> for RefId {
    fn from(id: PointId) -> Self {
        RefId::Point(id)
    }
}

impl From<LineId> for RefId {
    fn from(id: LineId) -> Self {
        RefId::Line(id)
    }
}

/// Which fold produced a line, with its inputs in citation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axiom {
    /// Through two points.
    A1(PointId, PointId),
    /// First point onto second point.
    A2(PointId, PointId),
    /// First line onto second line.
    A3(LineId, LineId),
    /// Through a point, perpendicular to a line.
    A4(PointId, LineId),
    /// Point onto line, through a second point.
    A5(PointId, LineId, PointId),
    /// First point onto first line and second point onto second line.
    A6(PointId, LineId, PointId, LineId),
    /// Point onto first line, perpendicular to second line.
    A7(PointId, LineId, LineId),
}

impl Axiom {
    /// Axiom number, 1 through 7.
    pub fn number(&self) -> u8 {
        match self {
            Axiom::A1(..) => 1,
            Axiom::A2(..) => 2,
            Axiom::A3(..) => 3,
            Axiom::A4(..) => 4,
            Axiom::A5(..) => 5,
            Axiom::A6(..) => 6,
            Axiom::A7(..) => 7,
        }
    }

    pub fn inputs(&self) -> Vec<RefId> {
        match *self {
            Axiom::A1(p1, p2) | Axiom::A2(p1, p2) => vec![p1.into(), p2.into()],
            Axiom::A3(l1, l2) => vec![l1.into(), l2.into()],
            Axiom::A4(p, l) => vec![p.into(), l.into()],
            Axiom::A5(p1, l, p2) => vec![p1.into(), l.into(), p2.into()],
            Axiom::A6(p1, l1, p2, l2) => vec![p1.into(), l1.into(), p2.into(), l2.into()],
            Axiom::A7(p, l1, l2) => vec![p.into(), l1.into(), l2.into()],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointOrigin {
    Corner(Corner),
    Intersection(LineId, LineId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineOrigin {
    Edge(Edge),
    Fold(Axiom),
}

/// Display label of a reference.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Label {
    #[default]
    Unlabeled,
    /// Seeds are always known by name ("the left edge").
    Seed(&'static str),
    /// Letter assigned while building instructions.
    Assigned(String),
}

impl Label {
    pub fn is_unlabeled(&self) -> bool {
        matches!(self, Label::Unlabeled)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Unlabeled => f.write_str("_"),
            Label::Seed(name) => f.write_str(name),
            Label::Assigned(s) => f.write_str(s),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PointRef {
    pub point: Vector2<f64>,
    pub rank: usize,
    pub origin: PointOrigin,
    pub label: Label,
    /// Distance to the last matched target; `f64::MAX` until matched.
    pub distance_error: f64,
}

impl PointRef {
    pub fn is_seed(&self) -> bool {
        matches!(self.origin, PointOrigin::Corner(_))
    }

    /// Name used in instruction text: `point A` or the seed's name.
    pub fn describe(&self) -> String {
        match &self.label {
            Label::Assigned(s) => format!("point {s}"),
            other => other.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LineRef {
    pub line: Line,
    pub rank: usize,
    pub origin: LineOrigin,
    pub label: Label,
    /// Offset error against the last matched target; `f64::MAX` until matched.
    pub shift_error: f64,
    /// Angle error in degrees against the last matched target.
    pub angle_error: f64,
}

impl LineRef {
    pub fn is_seed(&self) -> bool {
        matches!(self.origin, LineOrigin::Edge(_))
    }

    /// Name used in instruction text: `line O` or the seed's name.
    pub fn describe(&self) -> String {
        match &self.label {
            Label::Assigned(s) => format!("line {s}"),
            other => other.to_string(),
        }
    }
}

/// Arena of all references from one closure run.
#[derive(Clone, Debug)]
pub struct RefStore {
    paper: Paper,
    points: Vec<PointRef>,
    lines: Vec<LineRef>,
    points_by_rank: Vec<Vec<PointId>>,
    lines_by_rank: Vec<Vec<LineId>>,
    point_keys: HashMap<PointKey, PointId>,
    line_keys: HashMap<LineKey, LineId>,
    edge_ids: [LineId; 4],
}

impl RefStore {
    /// Store seeded with the paper's 4 edges and 4 corners at rank 0.
    pub fn seeded(paper: Paper) -> Self {
        let mut store = Self {
            paper,
            points: Vec::new(),
            lines: Vec::new(),
            points_by_rank: vec![Vec::new()],
            lines_by_rank: vec![Vec::new()],
            point_keys: HashMap::new(),
            line_keys: HashMap::new(),
            edge_ids: [LineId(0), LineId(1), LineId(2), LineId(3)],
        };
        for (slot, e) in Edge::ALL.into_iter().enumerate() {
            let id = LineId(store.lines.len());
            store.line_keys.insert(paper.line_key(&paper.edge(e)), id);
            store.lines.push(LineRef {
                line: paper.edge(e),
                rank: 0,
                origin: LineOrigin::Edge(e),
                label: Label::Seed(e.name()),
                shift_error: f64::MAX,
                angle_error: f64::MAX,
            });
            store.lines_by_rank[0].push(id);
            store.edge_ids[slot] = id;
        }
        for c in Corner::ALL {
            let id = PointId(store.points.len());
            store.point_keys.insert(paper.point_key(paper.corner(c)), id);
            store.points.push(PointRef {
                point: paper.corner(c),
                rank: 0,
                origin: PointOrigin::Corner(c),
                label: Label::Seed(c.name()),
                distance_error: f64::MAX,
            });
            store.points_by_rank[0].push(id);
        }
        store
    }

    pub fn paper(&self) -> &Paper {
        &self.paper
    }

    pub fn point(&self, id: PointId) -> &PointRef {
        &self.points[id.0]
    }

    pub fn point_mut(&mut self, id: PointId) -> &mut PointRef {
        &mut self.points[id.0]
    }

    pub fn line(&self, id: LineId) -> &LineRef {
        &self.lines[id.0]
    }

    pub fn line_mut(&mut self, id: LineId) -> &mut LineRef {
        &mut self.lines[id.0]
    }

    pub fn edge_id(&self, e: Edge) -> LineId {
        let slot = Edge::ALL.iter().position(|&x| x == e).unwrap_or(0);
        self.edge_ids[slot]
    }

    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    pub fn num_lines(&self) -> usize {
        self.lines.len()
    }

    /// Highest rank with a slot (possibly empty).
    pub fn max_rank(&self) -> usize {
        self.lines_by_rank.len().max(self.points_by_rank.len()) - 1
    }

    pub fn points_at(&self, rank: usize) -> &[PointId] {
        self.points_by_rank.get(rank).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn lines_at(&self, rank: usize) -> &[LineId] {
        self.lines_by_rank.get(rank).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All point ids, rank by rank.
    pub fn point_ids(&self) -> impl Iterator<Item = PointId> + '_ {
        self.points_by_rank.iter().flatten().copied()
    }

    /// All line ids, rank by rank.
    pub fn line_ids(&self) -> impl Iterator<Item = LineId> + '_ {
        self.lines_by_rank.iter().flatten().copied()
    }

    pub fn find_point(&self, p: Vector2<f64>) -> Option<PointId> {
        self.point_keys.get(&self.paper.point_key(p)).copied()
    }

    pub fn find_line(&self, line: &Line) -> Option<LineId> {
        self.line_keys.get(&self.paper.line_key(line)).copied()
    }

    fn ensure_rank(&mut self, rank: usize) {
        while self.points_by_rank.len() <= rank {
            self.points_by_rank.push(Vec::new());
        }
        while self.lines_by_rank.len() <= rank {
            self.lines_by_rank.push(Vec::new());
        }
    }

    /// Open empty slots up to `rank` so ranks without discoveries still show up.
    pub fn open_rank(&mut self, rank: usize) {
        self.ensure_rank(rank);
    }

    /// Insert a derived point; `None` if its identity key is already taken.
    pub fn insert_point(
        &mut self,
        point: Vector2<f64>,
        rank: usize,
        origin: PointOrigin,
    ) -> Option<PointId> {
        let key = self.paper.point_key(point);
        if self.point_keys.contains_key(&key) {
            return None;
        }
        self.ensure_rank(rank);
        let id = PointId(self.points.len());
        self.point_keys.insert(key, id);
        self.points.push(PointRef {
            point,
            rank,
            origin,
            label: Label::Unlabeled,
            distance_error: f64::MAX,
        });
        self.points_by_rank[rank].push(id);
        Some(id)
    }

    /// Insert a derived line; `None` if its identity key is already taken.
    pub fn insert_line(&mut self, line: Line, rank: usize, origin: LineOrigin) -> Option<LineId> {
        let key = self.paper.line_key(&line);
        if self.line_keys.contains_key(&key) {
            return None;
        }
        self.ensure_rank(rank);
        let id = LineId(self.lines.len());
        self.line_keys.insert(key, id);
        self.lines.push(LineRef {
            line,
            rank,
            origin,
            label: Label::Unlabeled,
            shift_error: f64::MAX,
            angle_error: f64::MAX,
        });
        self.lines_by_rank[rank].push(id);
        Some(id)
    }

    pub fn is_seed(&self, id: RefId) -> bool {
        match id {
            RefId::Point(p) => self.point(p).is_seed(),
            RefId::Line(l) => self.line(l).is_seed(),
        }
    }

    pub fn label(&self, id: RefId) -> &Label {
        match id {
            RefId::Point(p) => &self.point(p).label,
            RefId::Line(l) => &self.line(l).label,
        }
    }

    pub fn set_label(&mut self, id: RefId, label: Label) {
        match id {
            RefId::Point(p) => self.point_mut(p).label = label,
            RefId::Line(l) => self.line_mut(l).label = label,
        }
    }

    pub fn describe(&self, id: RefId) -> String {
        match id {
            RefId::Point(p) => self.point(p).describe(),
            RefId::Line(l) => self.line(l).describe(),
        }
    }

    /// References a derived reference was built from, in citation order.
    /// Seeds have none.
    pub fn inputs(&self, id: RefId) -> Vec<RefId> {
        match id {
            RefId::Point(p) => match self.point(p).origin {
                PointOrigin::Corner(_) => Vec::new(),
                PointOrigin::Intersection(l1, l2) => vec![l1.into(), l2.into()],
            },
            RefId::Line(l) => match self.line(l).origin {
                LineOrigin::Edge(_) => Vec::new(),
                LineOrigin::Fold(axiom) => axiom.inputs(),
            },
        }
    }

    /// The two lines meeting at a point (a corner's two edges).
    pub fn defining_lines(&self, id: PointId) -> (LineId, LineId) {
        match self.point(id).origin {
            PointOrigin::Intersection(l1, l2) => (l1, l2),
            PointOrigin::Corner(c) => {
                let (e1, e2) = c.edges();
                (self.edge_id(e1), self.edge_id(e2))
            }
        }
    }

    /// Number of points and lines carrying an assigned letter.
    pub fn assigned_labels(&self) -> (usize, usize) {
        let assigned = |label: &Label| matches!(label, Label::Assigned(_));
        (
            self.points.iter().filter(|p| assigned(&p.label)).count(),
            self.lines.iter().filter(|l| assigned(&l.label)).count(),
        )
    }

    /// Reset every assigned letter back to unlabeled; seed names stay.
    pub fn clear_labels(&mut self) {
        for p in &mut self.points {
            if matches!(p.label, Label::Assigned(_)) {
                p.label = Label::Unlabeled;
            }
        }
        for l in &mut self.lines {
            if matches!(l.label, Label::Assigned(_)) {
                l.label = Label::Unlabeled;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    #[test]
    fn seeds_cover_rank_zero() {
        let store = RefStore::seeded(Paper::new(1.0, 1.0));
        assert_eq!(store.points_at(0).len(), 4);
        assert_eq!(store.lines_at(0).len(), 4);
        assert!(store.point_ids().all(|id| store.is_seed(id.into())));
        let bl = store.find_point(vector![0.0, 0.0]).unwrap();
        assert_eq!(store.point(bl).describe(), "the bottom left corner");
        let (l1, l2) = store.defining_lines(bl);
        assert_eq!(store.line(l1).describe(), "the left edge");
        assert_eq!(store.line(l2).describe(), "the bottom edge");
        assert!(store.inputs(bl.into()).is_empty());
    }

    #[test]
    fn first_insertion_wins() {
        let mut store = RefStore::seeded(Paper::new(1.0, 1.0));
        let mid = Line::from_unit(vector![1.0, 0.0], 0.5);
        let a = PointId(0);
        let b = PointId(1);
        let id = store
            .insert_line(mid, 1, LineOrigin::Fold(Axiom::A2(a, b)))
            .unwrap();
        let again = Line::from_unit(vector![1.0, 1e-9].normalize(), 0.5);
        assert!(store
            .insert_line(again, 2, LineOrigin::Fold(Axiom::A1(a, b)))
            .is_none());
        assert_eq!(store.find_line(&again), Some(id));
        assert_eq!(store.line(id).rank, 1);
        // Re-inserting a seed edge is a duplicate as well.
        let left = store.paper().edge(Edge::Left);
        assert!(store
            .insert_line(left, 1, LineOrigin::Fold(Axiom::A2(a, b)))
            .is_none());
        assert_eq!(store.lines_at(1), &[id]);
    }

    #[test]
    fn labels_display_and_clear() {
        let mut store = RefStore::seeded(Paper::new(1.0, 1.0));
        let bottom = store.edge_id(Edge::Bottom);
        let mid = store
            .insert_line(
                Line::from_unit(vector![1.0, 0.0], 0.5),
                1,
                LineOrigin::Fold(Axiom::A2(PointId(0), PointId(1))),
            )
            .unwrap();
        let p = store
            .insert_point(vector![0.5, 0.0], 1, PointOrigin::Intersection(bottom, mid))
            .unwrap();
        assert_eq!(store.describe(p.into()), "_");
        store.set_label(p.into(), Label::Assigned("A".into()));
        store.set_label(mid.into(), Label::Assigned("O".into()));
        assert_eq!(store.describe(p.into()), "point A");
        assert_eq!(store.describe(mid.into()), "line O");
        assert_eq!(store.inputs(p.into()), vec![bottom.into(), mid.into()]);
        store.clear_labels();
        assert!(store.label(p.into()).is_unlabeled());
        assert_eq!(store.describe(bottom.into()), "the bottom edge");
    }

    #[test]
    fn axiom_numbers_and_inputs() {
        let a6 = Axiom::A6(PointId(1), LineId(2), PointId(3), LineId(4));
        assert_eq!(a6.number(), 6);
        assert_eq!(
            a6.inputs(),
            vec![
                RefId::Point(PointId(1)),
                RefId::Line(LineId(2)),
                RefId::Point(PointId(3)),
                RefId::Line(LineId(4)),
            ]
        );
    }
}
