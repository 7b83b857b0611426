//! Shared primitives for the rescomp data compiler.
//!
//! Every phase of the pipeline speaks the vocabulary defined here: the
//! warning taxonomy that drives pass/fail aggregation, the canonical key
//! model used for primary/foreign key equality, field paths into raw JSON
//! rows, and the cooperative cancellation flag.

#![deny(missing_docs)]

/// Cooperative cancellation flag threaded through the pipeline.
pub mod cancel;
/// Dot-separated paths into JSON objects.
pub mod fieldpath;
/// Canonical key model and scalar canonicalization.
pub mod key;
/// Warning taxonomy shared across all phases.
pub mod warnings;

pub use cancel::{CancelFlag, Cancelled};
pub use fieldpath::FieldPath;
pub use key::{canonicalize_key, KeyError, KeyKind, KeyValue};
pub use warnings::{has_errors, Severity, Warning, WarningCode};
