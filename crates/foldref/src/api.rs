//! Curated surface for the CLI and integration tests (UNSTABLE).
//!
//! Prefer these re-exports over deep module paths; breaking changes are
//! allowed when they improve the design.

// Configuration and errors
pub use crate::config::{AxiomSet, FinderConfig, PaperSpec, Tolerances, MAX_RANK_LIMIT};
pub use crate::error::{BuildError, ConfigError};
// Geometry
pub use crate::geom2::{fmt_num, fmt_point, Line};
pub use crate::paper::{Corner, Edge, GridRes, Paper};
// References and closure
pub use crate::closure::{Closure, ClosureStats, LineMatch, PointMatch, RankCount};
pub use crate::refs::{Axiom, Label, LineId, LineOrigin, PointId, PointOrigin, RefId, RefStore};
// Instructions
pub use crate::instructions::{
    build_instructions, coalesce, render_steps, Diagram, RenderedDiagram, RenderedStep, Segment,
    Step,
};
// Session
pub use crate::sheet::Sheet;
