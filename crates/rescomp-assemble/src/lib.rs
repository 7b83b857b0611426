//! Nested document assembly.
//!
//! Root entity rows become top-level compiled documents; each declared child
//! relationship is resolved through the foreign-key indexes, ordered
//! deterministically, and embedded recursively subject to a depth ceiling
//! and a cycle guard scoped to the active descent path.

#![deny(missing_docs)]

/// Recursive document assembly.
pub mod assembler;
/// Cycle detection over the active ancestor chain.
pub mod guard;
/// Deterministic sibling ordering.
pub mod ordering;

pub use assembler::{AssemblyResult, CompiledDocument, DocumentAssembler};
pub use guard::RecursionGuard;
pub use ordering::sort_rows;
