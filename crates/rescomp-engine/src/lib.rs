//! Compilation run orchestration.
//!
//! A run executes the pipeline phases in a fixed order: manifest load,
//! manifest validation, raw data load, index build, document assembly,
//! output planning, output write. Any `Error`-severity warning stops the
//! run after its phase with nothing persisted; files are written into a
//! staged directory that replaces the output root only on full success.

#![deny(missing_docs)]

/// Phase sequencing and error gating.
pub mod engine;
/// Fatal run failures.
pub mod error;
/// Run configuration.
pub mod options;
/// Run outcome summary.
pub mod report;

pub use engine::Engine;
pub use error::EngineError;
pub use options::{RunOptions, DEFAULT_MAX_DEPTH};
pub use report::RunReport;
