//! Output planning and atomic writing.
//!
//! Compiled documents and indexes are first planned into a set of
//! (relative path, canonical JSON bytes) files, validated for template and
//! path-safety errors and collisions, and only then written: each file goes
//! through a temp-file-then-rename publish, and the whole tree is staged in
//! a scratch directory the orchestrator renames onto the output root on
//! success.

#![deny(missing_docs)]

/// Fixed slug+hash output layout.
pub mod layout;
/// Output plan construction for both layouts.
pub mod planner;
/// Staged output root publishing.
pub mod staging;
/// `{token}` path template rendering.
pub mod template;
/// Atomic file writing.
pub mod writer;

pub use layout::OutputLayoutPolicy;
pub use planner::{OutputPlan, OutputPlanner, PlannedFile};
pub use staging::StagedRoot;
pub use template::TemplateRenderer;
pub use writer::{OutputError, OutputWriter};
