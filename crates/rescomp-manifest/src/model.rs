use std::collections::BTreeMap;

/// A fully loaded manifest: named map of entity definitions.
///
/// Entities are kept in a `BTreeMap` so that every pipeline phase iterating
/// over them does so in entity-name order; no unordered map iteration may
/// leak into output or warning ordering.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    /// Entity definitions keyed by entity name.
    pub entities: BTreeMap<String, Entity>,
}

impl Manifest {
    /// Looks up an entity definition by name.
    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.get(name)
    }
}

/// Declaration of one entity table.
#[derive(Debug, Clone, Default)]
pub struct Entity {
    /// Entity name (map key, repeated here for convenience).
    pub name: String,
    /// Raw data file name, relative to the raw data directory.
    pub file: String,
    /// Primary key field path.
    pub primary_key: String,
    /// Whether rows of this entity become top-level compiled documents.
    pub is_root: bool,
    /// Field supplying the `{slug}` template token when the document has no
    /// `slug` field of its own.
    pub slug_field: Option<String>,
    /// Ordering of this entity's root documents.
    pub order_by: Option<OrderBy>,
    /// Child relationships, in declaration order.
    pub children: Vec<ChildRelationship>,
    /// Declared output shape; absence selects the fixed slug+hash layout.
    pub output: Option<OutputSpec>,
}

/// A parent-to-child relationship declaration.
#[derive(Debug, Clone, Default)]
pub struct ChildRelationship {
    /// Child entity name.
    pub entity: String,
    /// Output field rename; the child entity name is used when empty.
    pub output_field: Option<String>,
    /// Foreign key field path on child rows.
    pub fk_field: String,
    /// Ordering of sibling child rows.
    pub order_by: Option<OrderBy>,
    /// Per-relationship depth ceiling; the run's global ceiling applies when
    /// absent.
    pub max_depth: Option<u32>,
}

impl ChildRelationship {
    /// The field name the child array is emitted under.
    pub fn output_name(&self) -> &str {
        match &self.output_field {
            Some(name) if !name.is_empty() => name,
            _ => &self.entity,
        }
    }
}

/// Declared ordering for sibling rows.
#[derive(Debug, Clone)]
pub struct OrderBy {
    /// Field path supplying the order key.
    pub field: String,
    /// Sort direction; `None` when the manifest declared an unparsable
    /// direction (rejected by validation).
    pub direction: Option<Direction>,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Ascending.
    Asc,
    /// Descending; also flips the key-kind comparison.
    Desc,
}

/// Declared output shape for an entity.
#[derive(Debug, Clone, Default)]
pub struct OutputSpec {
    /// Path template with `{token}` placeholders, one rendered file per
    /// document.
    pub blob_template: String,
    /// Optional projected index over the entity's documents.
    pub index: Option<OutputIndexSpec>,
}

/// Declared projected index blob.
#[derive(Debug, Clone, Default)]
pub struct OutputIndexSpec {
    /// Output path of the index blob.
    pub blob: String,
    /// Fields projected per document; missing fields serialize as null.
    pub fields: Vec<String>,
}
