use crate::refs::RefStore;

use super::Step;

/// Merge intersection-only steps into the step whose fold made one of the
/// point's lines.
///
/// Runs from the last step back to the second. A merged point joins the
/// earlier diagram's points, its sentence goes right after that step's first
/// sentence, and its own step is removed.
pub fn coalesce(store: &RefStore, steps: &mut Vec<Step>) {
    for i in (1..steps.len()).rev() {
        if steps[i].diagram.fold.is_some() {
            continue;
        }
        let Some(&point) = steps[i].diagram.points.first() else {
            continue;
        };
        let (l1, l2) = store.defining_lines(point);
        let Some(j) = (0..i)
            .rev()
            .find(|&j| matches!(steps[j].diagram.fold, Some(f) if f == l1 || f == l2))
        else {
            continue;
        };
        let merged = steps.remove(i);
        let target = &mut steps[j];
        target.diagram.points.push(point);
        let at = target.text.find('.').map_or(target.text.len(), |k| k + 1);
        target.text.insert_str(at, &format!(" {}", merged.text));
    }
}
