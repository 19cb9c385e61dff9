//! Error types for configuration checks and closure builds.
//!
//! Geometric degeneracy is never an error (solvers return `Option`/empty
//! `Vec`), and hitting a point/line cap only marks the run as truncated.

use thiserror::Error;

/// Rejected configuration values, reported by `FinderConfig::validate`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("paper {name} must be positive and finite, got {value}")]
    PaperDimension { name: &'static str, value: f64 },

    #[error("max_rank must be between 1 and {max}, got {value}")]
    MaxRank { value: usize, max: usize },

    #[error("grid resolution {0} must be non-zero")]
    GridResolution(&'static str),

    #[error("tolerance {name} must be positive and finite, got {value}")]
    Tolerance { name: &'static str, value: f64 },

    #[error("{0} must be at least 1")]
    Cap(&'static str),

    #[error("unknown axiom {0}, expected 1 through 7")]
    UnknownAxiom(u8),
}

/// Why a closure build produced no result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("closure build was cancelled")]
    Cancelled,

    #[error("closure worker thread panicked")]
    WorkerPanicked,

    #[error("no closure build has been started")]
    NotStarted,
}
