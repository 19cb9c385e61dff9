//! Finder configuration: paper, enabled axioms, rank bound, tolerances.
//!
//! All structs implement `Default` and deserialize with missing fields
//! falling back to those defaults, so a JSON config only needs the values it
//! changes. `FinderConfig::validate` is the boundary check; the engine assumes
//! a validated config.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::paper::{GridRes, Paper};

/// Largest supported rank; closures beyond this are impractically large.
pub const MAX_RANK_LIMIT: usize = 6;

/// Sheet dimensions. With `square`, the height follows the width.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaperSpec {
    pub width: f64,
    pub height: f64,
    pub square: bool,
}

impl Default for PaperSpec {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
            square: false,
        }
    }
}

impl PaperSpec {
    pub fn effective_height(&self) -> f64 {
        if self.square {
            self.width
        } else {
            self.height
        }
    }
}

/// Enable flag per axiom; index 0 is axiom 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AxiomSet(pub [bool; 7]);

impl Default for AxiomSet {
    fn default() -> Self {
        Self::all()
    }
}

impl AxiomSet {
    /// Order in which a rank's axioms are enumerated.
    pub const ENUMERATION_ORDER: [u8; 7] = [3, 2, 7, 6, 5, 4, 1];

    pub fn all() -> Self {
        Self([true; 7])
    }

    pub fn none() -> Self {
        Self([false; 7])
    }

    /// Only the listed axiom numbers enabled.
    pub fn from_numbers(numbers: &[u8]) -> Result<Self, ConfigError> {
        let mut set = Self::none();
        for &n in numbers {
            if !(1..=7).contains(&n) {
                return Err(ConfigError::UnknownAxiom(n));
            }
            set.0[usize::from(n - 1)] = true;
        }
        Ok(set)
    }

    pub fn is_enabled(&self, number: u8) -> bool {
        (1..=7).contains(&number) && self.0[usize::from(number - 1)]
    }

    /// Enabled axioms in enumeration order.
    pub fn enabled(&self) -> impl Iterator<Item = u8> {
        let set = *self;
        Self::ENUMERATION_ORDER
            .into_iter()
            .filter(move |&n| set.is_enabled(n))
    }
}

/// Numeric tolerances, grid resolution, and caps.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerances {
    /// Equality slack for containment and parallelism.
    pub eps: f64,
    /// Slack for verifying axiom 6 solutions.
    pub fit_eps: f64,
    #[serde(flatten)]
    pub grid: GridRes,
    /// Minimum angle (degrees) between two lines for their intersection to count.
    pub min_angle: f64,
    pub max_points: usize,
    pub max_lines: usize,
    pub max_matches: usize,
    pub max_aspect_ratio: f64,
    pub max_distance_error: f64,
    pub max_shift_error: f64,
    /// Degrees.
    pub max_angle_error: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            eps: Paper::DEFAULT_EPS,
            fit_eps: crate::axioms::DEFAULT_FIT_EPS,
            grid: GridRes::default(),
            min_angle: 5.0,
            max_points: 50_000,
            max_lines: 50_000,
            max_matches: 15,
            max_aspect_ratio: Paper::DEFAULT_MAX_ASPECT_RATIO,
            max_distance_error: 0.05,
            max_shift_error: 0.08,
            max_angle_error: 2.0,
        }
    }
}

/// Everything a closure build depends on.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinderConfig {
    pub paper: PaperSpec,
    pub axioms: AxiomSet,
    pub max_rank: usize,
    pub tolerances: Tolerances,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            paper: PaperSpec::default(),
            axioms: AxiomSet::default(),
            max_rank: 4,
            tolerances: Tolerances::default(),
        }
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Tolerance { name, value })
    }
}

impl FinderConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("width", self.paper.width),
            ("height", self.paper.effective_height()),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::PaperDimension { name, value });
            }
        }
        if !(1..=MAX_RANK_LIMIT).contains(&self.max_rank) {
            return Err(ConfigError::MaxRank {
                value: self.max_rank,
                max: MAX_RANK_LIMIT,
            });
        }
        let t = &self.tolerances;
        for (name, n) in [
            ("num_x", t.grid.num_x),
            ("num_y", t.grid.num_y),
            ("num_radius", t.grid.num_radius),
            ("num_angle", t.grid.num_angle),
        ] {
            if n == 0 {
                return Err(ConfigError::GridResolution(name));
            }
        }
        positive("eps", t.eps)?;
        positive("fit_eps", t.fit_eps)?;
        positive("min_angle", t.min_angle)?;
        positive("max_aspect_ratio", t.max_aspect_ratio)?;
        positive("max_distance_error", t.max_distance_error)?;
        positive("max_shift_error", t.max_shift_error)?;
        positive("max_angle_error", t.max_angle_error)?;
        for (name, n) in [
            ("max_points", t.max_points),
            ("max_lines", t.max_lines),
            ("max_matches", t.max_matches),
        ] {
            if n == 0 {
                return Err(ConfigError::Cap(name));
            }
        }
        Ok(())
    }

    /// The sheet this configuration describes, with its tolerances applied.
    pub fn paper(&self) -> Paper {
        Paper::with_tolerances(
            self.paper.width,
            self.paper.effective_height(),
            self.tolerances.eps,
            self.tolerances.max_aspect_ratio,
            self.tolerances.grid,
        )
    }
}
