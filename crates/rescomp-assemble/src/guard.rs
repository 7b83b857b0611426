use std::collections::HashSet;

use rescomp_core::KeyValue;

/// Tracks the `(entity, key)` pairs on the active descent path of one root
/// document's traversal.
///
/// A pair is a cycle only while it is an active ancestor; the same pair may
/// legitimately appear again via an independent branch of the same tree once
/// its earlier subtree has finished. State is scoped to a single root
/// document and never shared across documents.
#[derive(Debug, Default)]
pub struct RecursionGuard {
    active: HashSet<(String, KeyValue)>,
}

impl RecursionGuard {
    /// Creates a guard with an empty descent path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `(entity, key)` as an active ancestor. Returns false when the
    /// pair is already on the descent path, i.e. a genuine cycle.
    pub fn try_enter(&mut self, entity: &str, key: &KeyValue) -> bool {
        self.active.insert((entity.to_string(), key.clone()))
    }

    /// Removes `(entity, key)` from the descent path once its subtree
    /// finishes.
    pub fn exit(&mut self, entity: &str, key: &KeyValue) {
        self.active.remove(&(entity.to_string(), key.clone()));
    }
}
