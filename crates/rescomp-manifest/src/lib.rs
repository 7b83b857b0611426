//! Manifest model, YAML loader, and validator.
//!
//! The manifest is the declarative schema driving a compilation run: entity
//! tables, their primary/foreign keys, parent-child relationships, ordering,
//! and output shape. Loading is tolerant (unknown keys are ignored, missing
//! fields map to empty defaults); validation is strict and reports every
//! problem as an `Error`-severity warning.

#![deny(missing_docs)]

/// YAML loader producing the strict model from permissive DTOs.
pub mod loader;
/// Manifest data model.
pub mod model;
/// Structural validation of a loaded manifest.
pub mod validator;

pub use loader::{ManifestLoadResult, ManifestLoader};
pub use model::{
    ChildRelationship, Direction, Entity, Manifest, OrderBy, OutputIndexSpec, OutputSpec,
};
pub use validator::ManifestValidator;
