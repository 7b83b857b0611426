//! Raw data loading and index construction.
//!
//! The loader reads one JSON array per declared entity and extracts each
//! row's primary key value; the builder turns the loaded rows into an
//! injective primary-key index per entity and a foreign-key index per
//! (child entity, fk field) pair.

#![deny(missing_docs)]

/// PK/FK index construction.
pub mod builder;
/// Raw data loading.
pub mod raw;

pub use builder::{FkIndex, IndexBuilder, IndexSet, PkIndex};
pub use raw::{RawData, RawDataLoader, RawLoadError, RawLoadResult, RawRow};
