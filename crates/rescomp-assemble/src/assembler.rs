use serde_json::{Map, Value};

use rescomp_core::{canonicalize_key, CancelFlag, Cancelled, KeyValue, Warning, WarningCode};
use rescomp_index::{IndexSet, RawData, RawRow};
use rescomp_manifest::{Entity, Manifest};

use crate::guard::RecursionGuard;
use crate::ordering::sort_rows;

/// One compiled top-level document.
#[derive(Debug, Clone)]
pub struct CompiledDocument {
    /// Root entity the document belongs to.
    pub entity: String,
    /// Canonical primary key of the root row.
    pub key: KeyValue,
    /// Nested JSON payload: the row's scalar fields plus one array per
    /// declared child relationship.
    pub payload: Value,
}

/// Result of the assembly phase.
#[derive(Debug, Default)]
pub struct AssemblyResult {
    /// Compiled documents in root-entity-name order, then root row order.
    pub documents: Vec<CompiledDocument>,
    /// Warnings produced during assembly.
    pub warnings: Vec<Warning>,
}

impl AssemblyResult {
    /// True when any warning has `Error` severity.
    pub fn has_errors(&self) -> bool {
        rescomp_core::has_errors(&self.warnings)
    }
}

/// Recursively builds nested documents for root entities.
///
/// Assembly is a pure function of the manifest, raw data, and indexes:
/// identical inputs yield byte-identical serialized payloads. A child array
/// is assigned under its relationship's output name and deterministically
/// overwrites a same-named raw scalar field.
#[derive(Debug, Default)]
pub struct DocumentAssembler;

impl DocumentAssembler {
    /// Creates an assembler.
    pub fn new() -> Self {
        Self
    }

    /// Assembles every root entity's documents.
    pub fn assemble(
        &self,
        manifest: &Manifest,
        raw: &RawData,
        indexes: &IndexSet,
        max_depth: u32,
        cancel: &CancelFlag,
    ) -> Result<AssemblyResult, Cancelled> {
        let mut result = AssemblyResult::default();

        for (name, entity) in &manifest.entities {
            if !entity.is_root {
                continue;
            }

            let rows: Vec<&RawRow> = raw.rows(name).iter().collect();
            let ordered = sort_rows(rows, entity.order_by.as_ref(), name, &mut result.warnings);

            for row in ordered {
                cancel.check()?;

                // Rows without a resolvable key were already rejected by the
                // index phase; they produce no document.
                let Some(key) = row.pk.as_ref().and_then(|pk| canonicalize_key(pk).ok()) else {
                    continue;
                };

                let mut guard = RecursionGuard::new();
                if !guard.try_enter(name, &key) {
                    result.warnings.push(cycle_warning(name, &key));
                    continue;
                }
                let payload = self.assemble_node(
                    entity, row, &key, 0, max_depth, manifest, raw, indexes, &mut guard, cancel,
                    &mut result.warnings,
                )?;
                guard.exit(name, &key);

                result.documents.push(CompiledDocument {
                    entity: name.clone(),
                    key,
                    payload,
                });
            }
        }

        Ok(result)
    }

    #[allow(clippy::too_many_arguments)]
    fn assemble_node(
        &self,
        entity: &Entity,
        row: &RawRow,
        key: &KeyValue,
        depth: u32,
        max_depth: u32,
        manifest: &Manifest,
        raw: &RawData,
        indexes: &IndexSet,
        guard: &mut RecursionGuard,
        cancel: &CancelFlag,
        warnings: &mut Vec<Warning>,
    ) -> Result<Value, Cancelled> {
        let mut payload = match row.value.as_object() {
            Some(map) => map.clone(),
            None => Map::new(),
        };

        for relationship in &entity.children {
            cancel.check()?;

            let output_name = relationship.output_name();
            if output_name.is_empty() {
                continue;
            }
            if relationship.entity.is_empty() {
                payload.insert(output_name.to_string(), Value::Array(Vec::new()));
                continue;
            }

            let children = self.assemble_children(
                relationship, key, depth, max_depth, manifest, raw, indexes, guard, cancel,
                warnings,
            )?;
            payload.insert(output_name.to_string(), Value::Array(children));
        }

        Ok(Value::Object(payload))
    }

    #[allow(clippy::too_many_arguments)]
    fn assemble_children(
        &self,
        relationship: &rescomp_manifest::ChildRelationship,
        parent_key: &KeyValue,
        depth: u32,
        max_depth: u32,
        manifest: &Manifest,
        raw: &RawData,
        indexes: &IndexSet,
        guard: &mut RecursionGuard,
        cancel: &CancelFlag,
        warnings: &mut Vec<Warning>,
    ) -> Result<Vec<Value>, Cancelled> {
        let child_name = relationship.entity.as_str();
        let Some(child_entity) = manifest.entity(child_name) else {
            return Ok(Vec::new());
        };
        let Some(fk_index) = indexes.fk_lookup(child_name, &relationship.fk_field) else {
            return Ok(Vec::new());
        };
        let Some(positions) = fk_index.rows_by_key.get(parent_key) else {
            return Ok(Vec::new());
        };

        let child_rows = raw.rows(child_name);
        let matching: Vec<&RawRow> = positions
            .iter()
            .filter_map(|&position| child_rows.iter().find(|row| row.row_index == position))
            .collect();
        let ordered = sort_rows(
            matching,
            relationship.order_by.as_ref(),
            child_name,
            warnings,
        );

        let limit = relationship
            .max_depth
            .map(|declared| declared.min(max_depth))
            .unwrap_or(max_depth);

        let mut children = Vec::with_capacity(ordered.len());
        for child_row in ordered {
            cancel.check()?;

            let Some(child_key) = child_row
                .pk
                .as_ref()
                .and_then(|pk| canonicalize_key(pk).ok())
            else {
                continue;
            };

            let next_depth = depth + 1;
            if next_depth > limit {
                warnings.push(
                    Warning::warning(
                        WarningCode::MaxDepthExceeded,
                        format!(
                            "child '{}' ({}) at depth {} exceeds the maximum depth {}",
                            child_name, child_key, next_depth, limit
                        ),
                    )
                    .with_entity(child_name.to_string()),
                );
                continue;
            }

            if !guard.try_enter(child_name, &child_key) {
                warnings.push(cycle_warning(child_name, &child_key));
                continue;
            }
            let child_payload = self.assemble_node(
                child_entity, child_row, &child_key, next_depth, max_depth, manifest, raw,
                indexes, guard, cancel, warnings,
            )?;
            guard.exit(child_name, &child_key);

            children.push(child_payload);
        }

        Ok(children)
    }
}

fn cycle_warning(entity: &str, key: &KeyValue) -> Warning {
    Warning::warning(
        WarningCode::CycleDetected,
        format!("cycle detected at ('{}', '{}'); branch truncated", entity, key),
    )
    .with_entity(entity.to_string())
}
