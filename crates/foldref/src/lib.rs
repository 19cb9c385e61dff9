//! Origami reference finding with the Huzita–Justin axioms.
//!
//! Starting from a rectangular sheet (4 corners, 4 edges), the closure engine
//! applies the seven fold axioms rank by rank and records every distinct point
//! and line it reaches. Callers then ask for the references nearest a target
//! and for a step-by-step fold sequence that constructs one of them.
//!
//! Layout
//! - `geom2`, `paper`: 2D primitives and the sheet (containment, identity keys).
//! - `axioms`: the seven fold constructors.
//! - `refs`, `closure`: the ranked reference arena and its builder.
//! - `instructions`: fold sequences, diagrams, and arrows.
//! - `sheet`: a session owning a background build.
//!
//! API Policy
//! - `api` is the curated surface for the CLI and tests; module paths may move.

pub mod api;
pub mod axioms;
pub mod closure;
pub mod config;
pub mod error;
pub mod geom2;
pub mod instructions;
pub mod paper;
pub mod refs;
pub mod sheet;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use nalgebra::Vector2 as Vec2;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::config::{AxiomSet, FinderConfig, PaperSpec, Tolerances};
    pub use crate::geom2::Line;
    pub use crate::refs::{LineId, PointId, RefId};
    pub use crate::sheet::Sheet;
    pub use nalgebra::Vector2 as Vec2;
}
