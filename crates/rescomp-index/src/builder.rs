use std::collections::BTreeMap;

use rescomp_core::{canonicalize_key, CancelFlag, Cancelled, FieldPath, KeyValue, Warning, WarningCode};
use rescomp_manifest::Manifest;

use crate::raw::RawData;

/// Injective primary-key index for one entity.
///
/// Values are positions into the entity's raw row list; no two rows share a
/// canonical key (the first occurrence wins, later duplicates are rejected).
#[derive(Debug, Clone)]
pub struct PkIndex {
    /// Entity the index belongs to.
    pub entity: String,
    /// Canonical key -> row position.
    pub rows_by_key: BTreeMap<KeyValue, usize>,
}

/// Foreign-key index for one (parent, child entity, fk field) relationship.
#[derive(Debug, Clone)]
pub struct FkIndex {
    /// Parent entity that declared the relationship.
    pub parent: String,
    /// Child entity being indexed.
    pub child: String,
    /// Foreign key field path on child rows.
    pub field: String,
    /// Parent canonical key -> child row positions, in source row order.
    pub rows_by_key: BTreeMap<KeyValue, Vec<usize>>,
}

/// All indexes for a run, built once and consumed read-only.
#[derive(Debug, Default)]
pub struct IndexSet {
    /// Primary-key index per entity.
    pub pk: BTreeMap<String, PkIndex>,
    /// Foreign-key indexes, one per distinct (child entity, fk field) pair,
    /// in declaration order.
    pub fk: Vec<FkIndex>,
    /// Warnings produced while indexing.
    pub warnings: Vec<Warning>,
}

impl IndexSet {
    /// True when any warning has `Error` severity.
    pub fn has_errors(&self) -> bool {
        rescomp_core::has_errors(&self.warnings)
    }

    /// Finds the foreign-key index for a (child entity, fk field) pair.
    pub fn fk_lookup(&self, child: &str, field: &str) -> Option<&FkIndex> {
        self.fk
            .iter()
            .find(|index| index.child == child && index.field == field)
    }
}

/// Builds PK and FK indexes from loaded raw data.
#[derive(Debug, Default)]
pub struct IndexBuilder;

impl IndexBuilder {
    /// Creates a builder.
    pub fn new() -> Self {
        Self
    }

    /// Builds every index declared by the manifest.
    ///
    /// PK violations (`MissingPk`, `InvalidPkType`, `DuplicatePk`) are
    /// Errors and skip the offending row; FK issues (`MissingFk`,
    /// `InvalidFkType`) are Warnings and exclude the row from that index
    /// only.
    pub fn build(
        &self,
        manifest: &Manifest,
        raw: &RawData,
        cancel: &CancelFlag,
    ) -> Result<IndexSet, Cancelled> {
        let mut set = IndexSet::default();

        for name in manifest.entities.keys() {
            cancel.check()?;
            let index = build_pk_index(name, raw, &mut set.warnings);
            set.pk.insert(name.clone(), index);
        }

        for (name, entity) in &manifest.entities {
            for child in &entity.children {
                cancel.check()?;
                if child.entity.is_empty() || child.fk_field.is_empty() {
                    continue;
                }
                // The validator rejects double registrations, so each
                // (child, field) pair is built at most once here.
                if set.fk_lookup(&child.entity, &child.fk_field).is_some() {
                    continue;
                }
                let index = build_fk_index(name, child.entity.as_str(), &child.fk_field, raw, &mut set.warnings);
                set.fk.push(index);
            }
        }

        Ok(set)
    }
}

fn build_pk_index(entity: &str, raw: &RawData, warnings: &mut Vec<Warning>) -> PkIndex {
    let mut rows_by_key = BTreeMap::new();

    for row in raw.rows(entity) {
        let Some(pk) = &row.pk else {
            warnings.push(
                Warning::error(
                    WarningCode::MissingPk,
                    format!("row {} of '{}' has no primary key value", row.row_index, entity),
                )
                .with_entity(entity.to_string())
                .with_path(format!("[{}]", row.row_index)),
            );
            continue;
        };

        let key = match canonicalize_key(pk) {
            Ok(key) => key,
            Err(err) => {
                warnings.push(
                    Warning::error(
                        WarningCode::InvalidPkType,
                        format!(
                            "row {} of '{}' has an unusable primary key: {}",
                            row.row_index, entity, err
                        ),
                    )
                    .with_entity(entity.to_string())
                    .with_path(format!("[{}]", row.row_index)),
                );
                continue;
            }
        };

        if rows_by_key.contains_key(&key) {
            warnings.push(
                Warning::error(
                    WarningCode::DuplicatePk,
                    format!(
                        "row {} of '{}' duplicates primary key '{}'",
                        row.row_index, entity, key
                    ),
                )
                .with_entity(entity.to_string())
                .with_path(format!("[{}]", row.row_index)),
            );
            continue;
        }

        rows_by_key.insert(key, row.row_index);
    }

    PkIndex {
        entity: entity.to_string(),
        rows_by_key,
    }
}

fn build_fk_index(
    parent: &str,
    child: &str,
    field: &str,
    raw: &RawData,
    warnings: &mut Vec<Warning>,
) -> FkIndex {
    let fk_path = FieldPath::parse(field);
    let mut rows_by_key: BTreeMap<KeyValue, Vec<usize>> = BTreeMap::new();

    for row in raw.rows(child) {
        let Some(fk_value) = fk_path.resolve(&row.value) else {
            warnings.push(
                Warning::warning(
                    WarningCode::MissingFk,
                    format!(
                        "row {} of '{}' has no value at foreign key '{}'",
                        row.row_index, child, field
                    ),
                )
                .with_entity(child.to_string())
                .with_path(format!("[{}].{}", row.row_index, field)),
            );
            continue;
        };

        let key = match canonicalize_key(fk_value) {
            Ok(key) => key,
            Err(err) => {
                warnings.push(
                    Warning::warning(
                        WarningCode::InvalidFkType,
                        format!(
                            "row {} of '{}' has an unusable foreign key at '{}': {}",
                            row.row_index, child, field, err
                        ),
                    )
                    .with_entity(child.to_string())
                    .with_path(format!("[{}].{}", row.row_index, field)),
                );
                continue;
            }
        };

        rows_by_key.entry(key).or_default().push(row.row_index);
    }

    FkIndex {
        parent: parent.to_string(),
        child: child.to_string(),
        field: field.to_string(),
        rows_by_key,
    }
}
