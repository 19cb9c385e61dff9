//! Construction closure: every point and line reachable from the sheet's
//! corners and edges within `max_rank` folds.
//!
//! Purpose
//! - Apply the enabled axioms rank by rank to previously known references,
//!   keeping only folds with a new identity key.
//! - After each rank's lines settle, add the intersections of line ranks
//!   summing to that rank.
//! - Answer nearest-reference queries for target points and lines.
//!
//! Model
//! - A line of rank `r` comes from inputs whose ranks sum to `r - 1`; a point
//!   of rank `r` is the intersection of two lines whose ranks sum to `r`.
//! - The first discovery of a key wins. Within one rank the axioms run in the
//!   order 3, 2, 7, 6, 5, 4, 1, so which derivation a line keeps depends on
//!   that order. A single build is deterministic: collections are ordered and
//!   hash maps are only used for key lookup.
//! - `max_points`/`max_lines` are soft caps: the rank that hits one keeps its
//!   partial results, higher ranks are skipped, and the closure is flagged as
//!   truncated.
//! - The stop flag is polled once per outer input element of every loop and
//!   between ranks; a cancelled build returns `BuildError::Cancelled`.

mod generate;
mod matching;

pub use matching::{LineMatch, PointMatch};

use std::sync::atomic::AtomicBool;

use serde::Serialize;

use crate::config::FinderConfig;
use crate::error::BuildError;
use crate::paper::Paper;
use crate::refs::RefStore;

use generate::Generator;

/// Reference counts discovered at one rank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RankCount {
    pub rank: usize,
    pub points: usize,
    pub lines: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClosureStats {
    pub ranks: Vec<RankCount>,
    /// True when a cap cut generation short.
    pub truncated: bool,
}

impl ClosureStats {
    fn of(store: &RefStore, truncated: bool) -> Self {
        let ranks = (0..=store.max_rank())
            .map(|rank| RankCount {
                rank,
                points: store.points_at(rank).len(),
                lines: store.lines_at(rank).len(),
            })
            .collect();
        Self { ranks, truncated }
    }

    pub fn total_points(&self) -> usize {
        self.ranks.iter().map(|r| r.points).sum()
    }

    pub fn total_lines(&self) -> usize {
        self.ranks.iter().map(|r| r.lines).sum()
    }
}

/// A finished closure together with the configuration that produced it.
#[derive(Clone, Debug)]
pub struct Closure {
    config: FinderConfig,
    store: RefStore,
    stats: ClosureStats,
}

impl Closure {
    /// Generate all ranks for `config`, checking `stop` as it goes.
    ///
    /// `config` is assumed to have passed `FinderConfig::validate`.
    pub fn build(config: &FinderConfig, stop: &AtomicBool) -> Result<Self, BuildError> {
        let (store, truncated) = Generator::new(config, stop).run()?;
        let stats = ClosureStats::of(&store, truncated);
        Ok(Self {
            config: *config,
            store,
            stats,
        })
    }

    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    pub fn paper(&self) -> &Paper {
        self.store.paper()
    }

    pub fn store(&self) -> &RefStore {
        &self.store
    }

    /// Mutable access for label assignment while building instructions.
    pub fn store_mut(&mut self) -> &mut RefStore {
        &mut self.store
    }

    pub fn stats(&self) -> &ClosureStats {
        &self.stats
    }

    pub fn is_truncated(&self) -> bool {
        self.stats.truncated
    }
}

#[cfg(test)]
mod tests;
