//! Rank-by-rank generation of folds and intersection points.

use std::sync::atomic::{AtomicBool, Ordering};

use nalgebra::Vector2;
use tracing::{debug, info, warn};

use crate::axioms;
use crate::config::FinderConfig;
use crate::error::BuildError;
use crate::geom2::{intersection_min_angle, Line};
use crate::paper::Paper;
use crate::refs::{Axiom, LineId, LineOrigin, PointId, PointOrigin, RefStore};

/// Why enumeration of the current rank stopped early.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Halt {
    /// A point or line cap was reached; partial results stand.
    Capped,
    /// The stop flag was raised; the whole build is discarded.
    Cancelled,
}

/// Splits of `total` into an unordered pair `(i, j)` with `i <= j`.
fn pair_splits(total: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..=total / 2).map(move |i| (i, total - i))
}

/// Splits of `total` into an ordered triple.
fn triple_splits(total: usize) -> impl Iterator<Item = (usize, usize, usize)> {
    (0..=total).flat_map(move |i| (0..=total - i).map(move |j| (i, j, total - i - j)))
}

/// Owns the store while it is being built.
pub(super) struct Generator<'a> {
    cfg: &'a FinderConfig,
    paper: Paper,
    store: RefStore,
    stop: &'a AtomicBool,
    rank: usize,
}

impl<'a> Generator<'a> {
    pub(super) fn new(cfg: &'a FinderConfig, stop: &'a AtomicBool) -> Self {
        let paper = cfg.paper();
        Self {
            cfg,
            paper,
            store: RefStore::seeded(paper),
            stop,
            rank: 0,
        }
    }

    /// Generate ranks `1..=max_rank`; returns the store and whether a cap truncated it.
    pub(super) fn run(mut self) -> Result<(RefStore, bool), BuildError> {
        let mut truncated = false;
        for rank in 1..=self.cfg.max_rank {
            if self.stop.load(Ordering::Relaxed) {
                return Err(BuildError::Cancelled);
            }
            self.rank = rank;
            self.store.open_rank(rank);
            // A capped line pass still gets its intersections.
            let lines = self.generate_lines();
            if lines == Err(Halt::Cancelled) {
                return Err(BuildError::Cancelled);
            }
            let points = self.generate_points();
            if points == Err(Halt::Cancelled) {
                return Err(BuildError::Cancelled);
            }
            truncated = lines.is_err() || points.is_err();
            info!(
                rank,
                points = self.store.points_at(rank).len(),
                lines = self.store.lines_at(rank).len(),
                "rank complete"
            );
            if truncated {
                warn!(
                    rank,
                    total_points = self.store.num_points(),
                    total_lines = self.store.num_lines(),
                    "cap reached; skipping higher ranks"
                );
                break;
            }
        }
        Ok((self.store, truncated))
    }

    #[inline]
    fn poll(&self) -> Result<(), Halt> {
        if self.stop.load(Ordering::Relaxed) {
            Err(Halt::Cancelled)
        } else {
            Ok(())
        }
    }

    #[inline]
    fn point(&self, id: PointId) -> Vector2<f64> {
        self.store.point(id).point
    }

    #[inline]
    fn line(&self, id: LineId) -> Line {
        self.store.line(id).line
    }

    fn add_line(&mut self, line: Line, axiom: Axiom) -> Result<(), Halt> {
        if self.store.find_line(&line).is_some() {
            return Ok(());
        }
        if self.store.num_lines() >= self.cfg.tolerances.max_lines {
            return Err(Halt::Capped);
        }
        self.store
            .insert_line(line, self.rank, LineOrigin::Fold(axiom));
        Ok(())
    }

    fn add_lines(&mut self, lines: Vec<Line>, axiom: Axiom) -> Result<(), Halt> {
        for line in lines {
            self.add_line(line, axiom)?;
        }
        Ok(())
    }

    fn generate_lines(&mut self) -> Result<(), Halt> {
        for number in self.cfg.axioms.enabled() {
            let before = self.store.num_lines();
            match number {
                1 => self.generate_axiom1()?,
                2 => self.generate_axiom2()?,
                3 => self.generate_axiom3()?,
                4 => self.generate_axiom4()?,
                5 => self.generate_axiom5()?,
                6 => self.generate_axiom6()?,
                _ => self.generate_axiom7()?,
            }
            debug!(
                rank = self.rank,
                axiom = number,
                added = self.store.num_lines() - before,
                "axiom pass"
            );
        }
        Ok(())
    }

    /// Visit each unordered pair of distinct points whose ranks sum to `rank - 1`.
    fn for_point_pairs(
        &mut self,
        mut visit: impl FnMut(&mut Self, PointId, PointId) -> Result<(), Halt>,
    ) -> Result<(), Halt> {
        for (i, j) in pair_splits(self.rank - 1) {
            let first = self.store.points_at(i).to_vec();
            let second = self.store.points_at(j).to_vec();
            for (a, &id1) in first.iter().enumerate() {
                self.poll()?;
                let partners = if i == j { &second[a + 1..] } else { &second[..] };
                for &id2 in partners {
                    visit(self, id1, id2)?;
                }
            }
        }
        Ok(())
    }

    fn generate_axiom1(&mut self) -> Result<(), Halt> {
        self.for_point_pairs(|g, id1, id2| {
            match axioms::axiom1(&g.paper, g.point(id1), g.point(id2)) {
                Some(fold) => g.add_line(fold, Axiom::A1(id1, id2)),
                None => Ok(()),
            }
        })
    }

    fn generate_axiom2(&mut self) -> Result<(), Halt> {
        self.for_point_pairs(|g, id1, id2| {
            match axioms::axiom2(&g.paper, g.point(id1), g.point(id2)) {
                Some(fold) => g.add_line(fold, Axiom::A2(id1, id2)),
                None => Ok(()),
            }
        })
    }

    fn generate_axiom3(&mut self) -> Result<(), Halt> {
        for (i, j) in pair_splits(self.rank - 1) {
            let first = self.store.lines_at(i).to_vec();
            let second = self.store.lines_at(j).to_vec();
            for (a, &id1) in first.iter().enumerate() {
                self.poll()?;
                let partners = if i == j { &second[a + 1..] } else { &second[..] };
                for &id2 in partners {
                    let folds = axioms::axiom3(&self.paper, &self.line(id1), &self.line(id2));
                    self.add_lines(folds, Axiom::A3(id1, id2))?;
                }
            }
        }
        Ok(())
    }

    fn generate_axiom4(&mut self) -> Result<(), Halt> {
        let total = self.rank - 1;
        let eps = self.paper.eps;
        for i in 0..=total {
            let points = self.store.points_at(i).to_vec();
            let lines = self.store.lines_at(total - i).to_vec();
            for &pid in &points {
                self.poll()?;
                let p = self.point(pid);
                for &lid in &lines {
                    let line = self.line(lid);
                    if line.contains(p, eps) {
                        continue;
                    }
                    if let Some(fold) = axioms::axiom4(&self.paper, p, &line) {
                        self.add_line(fold, Axiom::A4(pid, lid))?;
                    }
                }
            }
        }
        Ok(())
    }

    fn generate_axiom5(&mut self) -> Result<(), Halt> {
        let eps = self.paper.eps;
        for (i, j, k) in triple_splits(self.rank - 1) {
            let movers = self.store.points_at(i).to_vec();
            let lines = self.store.lines_at(j).to_vec();
            let pivots = self.store.points_at(k).to_vec();
            for &p1id in &movers {
                self.poll()?;
                let p1 = self.point(p1id);
                for &lid in &lines {
                    let line = self.line(lid);
                    if line.contains(p1, eps) {
                        continue;
                    }
                    for &p2id in &pivots {
                        let p2 = self.point(p2id);
                        if p1id == p2id || line.contains(p2, eps) {
                            continue;
                        }
                        let folds = axioms::axiom5(&self.paper, p1, &line, p2);
                        self.add_lines(folds, Axiom::A5(p1id, lid, p2id))?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Point ranks form an unordered pair, line ranks an ordered one; swapping
    /// `(p1, l1)` with `(p2, l2)` describes the same fold, so equal point
    /// ranks only visit `p1` before `p2`.
    fn generate_axiom6(&mut self) -> Result<(), Halt> {
        let total = self.rank - 1;
        let eps = self.paper.eps;
        let fit_eps = self.cfg.tolerances.fit_eps;
        for sum_points in 0..=total {
            let sum_lines = total - sum_points;
            for (i, j) in pair_splits(sum_points) {
                let first = self.store.points_at(i).to_vec();
                let second = self.store.points_at(j).to_vec();
                for k in 0..=sum_lines {
                    let lines1 = self.store.lines_at(k).to_vec();
                    let lines2 = self.store.lines_at(sum_lines - k).to_vec();
                    for (a, &p1id) in first.iter().enumerate() {
                        self.poll()?;
                        let p1 = self.point(p1id);
                        let partners = if i == j { &second[a + 1..] } else { &second[..] };
                        for &p2id in partners {
                            let p2 = self.point(p2id);
                            for &l1id in &lines1 {
                                let line1 = self.line(l1id);
                                if line1.contains(p1, eps) {
                                    continue;
                                }
                                for &l2id in &lines2 {
                                    let line2 = self.line(l2id);
                                    if l1id == l2id
                                        || line2.contains(p2, eps)
                                        || (line1.contains(p2, eps) && line2.contains(p1, eps))
                                    {
                                        continue;
                                    }
                                    let folds =
                                        axioms::axiom6(&self.paper, p1, &line1, p2, &line2, fit_eps);
                                    self.add_lines(folds, Axiom::A6(p1id, l1id, p2id, l2id))?;
                                }
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn generate_axiom7(&mut self) -> Result<(), Halt> {
        let eps = self.paper.eps;
        for (i, j, k) in triple_splits(self.rank - 1) {
            let targets = self.store.lines_at(i).to_vec();
            let points = self.store.points_at(j).to_vec();
            let guides = self.store.lines_at(k).to_vec();
            for &l1id in &targets {
                self.poll()?;
                let line1 = self.line(l1id);
                for &pid in &points {
                    let p = self.point(pid);
                    if line1.contains(p, eps) {
                        continue;
                    }
                    for &l2id in &guides {
                        if l1id == l2id {
                            continue;
                        }
                        if let Some(fold) = axioms::axiom7(&self.paper, p, &line1, &self.line(l2id))
                        {
                            self.add_line(fold, Axiom::A7(pid, l1id, l2id))?;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Intersections of line ranks summing to the current rank.
    fn generate_points(&mut self) -> Result<(), Halt> {
        let min_angle = self.cfg.tolerances.min_angle;
        for (i, j) in pair_splits(self.rank) {
            let first = self.store.lines_at(i).to_vec();
            let second = self.store.lines_at(j).to_vec();
            for (a, &l1id) in first.iter().enumerate() {
                self.poll()?;
                let line1 = self.line(l1id);
                let partners = if i == j { &second[a + 1..] } else { &second[..] };
                for &l2id in partners {
                    let line2 = self.line(l2id);
                    let Some(p) = intersection_min_angle(&line1, &line2, min_angle, self.paper.eps)
                    else {
                        continue;
                    };
                    if !self.paper.encloses(p) || self.store.find_point(p).is_some() {
                        continue;
                    }
                    if self.store.num_points() >= self.cfg.tolerances.max_points {
                        return Err(Halt::Capped);
                    }
                    self.store
                        .insert_point(p, self.rank, PointOrigin::Intersection(l1id, l2id));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_cover_every_sum() {
        assert_eq!(pair_splits(3).collect::<Vec<_>>(), vec![(0, 3), (1, 2)]);
        assert_eq!(pair_splits(2).collect::<Vec<_>>(), vec![(0, 2), (1, 1)]);
        assert_eq!(pair_splits(0).collect::<Vec<_>>(), vec![(0, 0)]);
        let triples: Vec<_> = triple_splits(2).collect();
        assert_eq!(triples.len(), 6);
        assert!(triples.iter().all(|&(i, j, k)| i + j + k == 2));
    }
}
