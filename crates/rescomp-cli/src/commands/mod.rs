//! CLI command implementations.

pub mod check;
pub mod compile;
pub mod key;
