//! Two-phase depth-first walk over the provenance DAG.

use std::collections::HashSet;

use crate::refs::{Axiom, Label, LineId, LineOrigin, PointId, RefId, RefStore};

use super::arrows::fold_arrows;
use super::{Diagram, LabelPool, Segment, Step};

/// Label every unlabeled reference `target` depends on and return the steps
/// that create them, target last.
///
/// A seed target yields a single empty step. Labels stay on the store until
/// `RefStore::clear_labels`; references labeled by an earlier call are
/// treated as already made, and new letters continue after theirs.
///
/// # Panics
/// If the provenance graph has a cycle.
pub fn build_instructions(store: &mut RefStore, target: RefId, overlay: &[Segment]) -> Vec<Step> {
    if store.is_seed(target) {
        return vec![Step {
            text: String::new(),
            diagram: Diagram {
                line_segments: overlay.to_vec(),
                ..Diagram::default()
            },
        }];
    }
    let (points_used, lines_used) = store.assigned_labels();
    let mut walk = Walk {
        store,
        overlay,
        points: LabelPool::points().skipping(points_used),
        lines: LabelPool::lines().skipping(lines_used),
        steps: Vec::new(),
    };
    walk.run(target);
    walk.steps
}

struct Walk<'a> {
    store: &'a mut RefStore,
    overlay: &'a [Segment],
    points: LabelPool,
    lines: LabelPool,
    steps: Vec<Step>,
}

impl Walk<'_> {
    fn is_made(&self, id: RefId) -> bool {
        self.store.is_seed(id) || !self.store.label(id).is_unlabeled()
    }

    fn run(&mut self, target: RefId) {
        let mut stack = vec![(target, false)];
        // Pushed back as ready but not yet labeled.
        let mut pending: HashSet<RefId> = HashSet::new();
        while let Some((id, ready)) = stack.pop() {
            if ready {
                pending.remove(&id);
                match id {
                    RefId::Point(p) => self.point_step(p),
                    RefId::Line(l) => self.line_step(l),
                }
                continue;
            }
            if self.is_made(id) {
                continue;
            }
            assert!(pending.insert(id), "provenance cycle through {id:?}");
            stack.push((id, true));
            for input in self.store.inputs(id) {
                if !self.is_made(input) {
                    stack.push((input, false));
                }
            }
        }
    }

    /// Start from the previous snapshot so creases accumulate.
    fn next_diagram(&self) -> Diagram {
        let mut diagram = self.steps.last().map(|s| s.diagram.clone()).unwrap_or_default();
        diagram.arrows.clear();
        diagram.line_segments = self.overlay.to_vec();
        diagram
    }

    fn point_step(&mut self, id: PointId) {
        let label = self.points.next_label();
        self.store.set_label(id.into(), Label::Assigned(label));
        let (l1, l2) = self.store.defining_lines(id);

        let mut diagram = self.next_diagram();
        if let Some(old) = diagram.fold.take() {
            diagram.add_crease(old);
        }
        diagram.lines = vec![l1, l2];
        diagram.points = vec![id];

        let text = format!(
            "The intersection between {} and {} creates {}.",
            self.store.line(l1).describe(),
            self.store.line(l2).describe(),
            self.store.point(id).describe(),
        );
        self.steps.push(Step { text, diagram });
    }

    fn line_step(&mut self, id: LineId) {
        let LineOrigin::Fold(axiom) = self.store.line(id).origin else {
            return;
        };
        let label = self.lines.next_label();
        self.store.set_label(id.into(), Label::Assigned(label));

        let (points, lines) = split_inputs(&axiom);
        let arrows = fold_arrows(self.store, &self.store.line(id).line, &axiom);
        let text = self.fold_text(id, &axiom);

        let mut diagram = self.next_diagram();
        let previous_lines = std::mem::take(&mut diagram.lines);
        for old in previous_lines {
            if !self.store.line(old).is_seed() {
                diagram.add_crease(old);
            }
        }
        diagram.creases.retain(|c| !lines.contains(c));
        if let Some(old) = diagram.fold.take() {
            diagram.add_crease(old);
        }
        diagram.fold = Some(id);
        diagram.points = points;
        diagram.lines = lines;
        diagram.arrows = arrows;
        self.steps.push(Step { text, diagram });
    }

    fn fold_text(&self, id: LineId, axiom: &Axiom) -> String {
        let p = |pid: PointId| self.store.point(pid).describe();
        let l = |lid: LineId| self.store.line(lid).describe();
        let made = l(id);
        match *axiom {
            Axiom::A1(p1, p2) => {
                format!("(A1) Fold through {} and {}, creating {made}.", p(p1), p(p2))
            }
            Axiom::A2(p1, p2) => format!("(A2) Fold {} onto {}, creating {made}.", p(p1), p(p2)),
            Axiom::A3(l1, l2) => format!("(A3) Fold {} onto {}, creating {made}.", l(l1), l(l2)),
            Axiom::A4(p1, l1) => format!(
                "(A4) Fold through {} perpendicular to {}, creating {made}.",
                p(p1),
                l(l1)
            ),
            Axiom::A5(p1, l1, p2) => format!(
                "(A5) Fold {} onto {} through {}, creating {made}.",
                p(p1),
                l(l1),
                p(p2)
            ),
            Axiom::A6(p1, l1, p2, l2) => format!(
                "(A6) Simultaneously fold {} onto {} and {} onto {}, creating {made}.",
                p(p1),
                l(l1),
                p(p2),
                l(l2)
            ),
            Axiom::A7(p1, l1, l2) => format!(
                "(A7) Fold {} onto {} perpendicular to {}, creating {made}.",
                p(p1),
                l(l1),
                l(l2)
            ),
        }
    }
}

/// Inputs shown on a fold diagram, split by kind.
fn split_inputs(axiom: &Axiom) -> (Vec<PointId>, Vec<LineId>) {
    let mut points = Vec::new();
    let mut lines = Vec::new();
    for input in axiom.inputs() {
        match input {
            RefId::Point(p) => points.push(p),
            RefId::Line(l) => lines.push(l),
        }
    }
    (points, lines)
}
