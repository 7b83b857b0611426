use std::collections::{BTreeMap, HashSet};

use serde_json::{Map, Value};

use rescomp_assemble::CompiledDocument;
use rescomp_core::{canonicalize_key, CancelFlag, Warning, WarningCode};
use rescomp_index::{IndexSet, RawData};
use rescomp_manifest::{Entity, Manifest};

use crate::layout::OutputLayoutPolicy;
use crate::template::TemplateRenderer;
use crate::writer::OutputError;

/// One file the run intends to write, relative to the output root.
#[derive(Debug, Clone)]
pub struct PlannedFile {
    /// Relative path using `/` separators.
    pub path: String,
    /// Canonical JSON bytes.
    pub bytes: Vec<u8>,
}

/// The complete set of files a run would write.
#[derive(Debug, Default)]
pub struct OutputPlan {
    /// Planned files in deterministic order.
    pub files: Vec<PlannedFile>,
    /// Warnings produced while planning.
    pub warnings: Vec<Warning>,
}

impl OutputPlan {
    /// True when any warning has `Error` severity.
    pub fn has_errors(&self) -> bool {
        rescomp_core::has_errors(&self.warnings)
    }
}

/// Plans every output file before anything touches the disk.
///
/// Entities with a declared `output.blobTemplate` use the template layout
/// (one rendered file per document plus an optional projected index); all
/// other entities use the fixed slug+hash layout. Planning up front means a
/// template error or path collision is discovered while the output root is
/// still untouched.
#[derive(Debug, Default)]
pub struct OutputPlanner {
    layout: OutputLayoutPolicy,
    renderer: TemplateRenderer,
}

impl OutputPlanner {
    /// Creates a planner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the output plan for a run.
    pub fn plan(
        &self,
        manifest: &Manifest,
        documents: &[CompiledDocument],
        indexes: &IndexSet,
        raw: &RawData,
        cancel: &CancelFlag,
    ) -> Result<OutputPlan, OutputError> {
        let mut plan = OutputPlan::default();

        let mut documents_by_entity: BTreeMap<&str, Vec<&CompiledDocument>> = BTreeMap::new();
        for document in documents {
            documents_by_entity
                .entry(document.entity.as_str())
                .or_default()
                .push(document);
        }

        let mut claimed_paths: HashSet<String> = HashSet::new();

        for (name, entity) in &manifest.entities {
            cancel.check()?;
            let entity_documents = documents_by_entity
                .get(name.as_str())
                .map(Vec::as_slice)
                .unwrap_or(&[]);

            match &entity.output {
                Some(_) => self.plan_template_entity(
                    entity,
                    entity_documents,
                    &mut claimed_paths,
                    &mut plan,
                    cancel,
                )?,
                None => self.plan_fixed_entity(
                    entity,
                    entity_documents,
                    indexes,
                    raw,
                    &mut claimed_paths,
                    &mut plan,
                    cancel,
                )?,
            }
        }

        Ok(plan)
    }

    fn plan_template_entity(
        &self,
        entity: &Entity,
        documents: &[&CompiledDocument],
        claimed_paths: &mut HashSet<String>,
        plan: &mut OutputPlan,
        cancel: &CancelFlag,
    ) -> Result<(), OutputError> {
        let Some(output) = &entity.output else {
            return Ok(());
        };

        for document in documents {
            cancel.check()?;

            let path = match self.renderer.render_path(
                &output.blob_template,
                &document.payload,
                entity.slug_field.as_deref(),
            ) {
                Ok(path) => path,
                Err(warning) => {
                    plan.warnings.push(warning.with_entity(entity.name.clone()));
                    continue;
                }
            };

            if !claim_path(&path, &entity.name, claimed_paths, &mut plan.warnings) {
                continue;
            }
            plan.files.push(PlannedFile {
                path,
                bytes: serialize(&document.payload)?,
            });
        }

        if let Some(index) = &output.index {
            let mut entries = Vec::with_capacity(documents.len());
            for document in documents {
                let mut projected = Map::new();
                for field in &index.fields {
                    let value = document.payload.get(field).cloned();
                    if value.is_none() {
                        plan.warnings.push(
                            Warning::warning(
                                WarningCode::OutputIndexFieldMissing,
                                format!(
                                    "document '{}' of '{}' has no field '{}'; serialized as null",
                                    document.key, entity.name, field
                                ),
                            )
                            .with_entity(entity.name.clone())
                            .with_path(field.clone()),
                        );
                    }
                    projected.insert(field.clone(), value.unwrap_or(Value::Null));
                }
                entries.push(Value::Object(projected));
            }

            let path = index.blob.replace('\\', "/");
            if !crate::template::is_safe_relative_path(&path) {
                plan.warnings.push(
                    Warning::error(
                        WarningCode::OutputTemplateMissingToken,
                        format!("index path '{}' is not a safe relative path", path),
                    )
                    .with_entity(entity.name.clone())
                    .with_path(path),
                );
            } else if claim_path(&path, &entity.name, claimed_paths, &mut plan.warnings) {
                plan.files.push(PlannedFile {
                    path,
                    bytes: serialize(&Value::Array(entries))?,
                });
            }
        }

        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn plan_fixed_entity(
        &self,
        entity: &Entity,
        documents: &[&CompiledDocument],
        indexes: &IndexSet,
        raw: &RawData,
        claimed_paths: &mut HashSet<String>,
        plan: &mut OutputPlan,
        cancel: &CancelFlag,
    ) -> Result<(), OutputError> {
        let name = entity.name.as_str();

        let payloads: Vec<Value> = documents
            .iter()
            .map(|document| document.payload.clone())
            .collect();
        let documents_path = self.layout.documents_path(name);
        if claim_path(&documents_path, name, claimed_paths, &mut plan.warnings) {
            plan.files.push(PlannedFile {
                path: documents_path,
                bytes: serialize(&Value::Array(payloads))?,
            });
        }

        let mut by_pk = Map::new();
        for (position, document) in documents.iter().enumerate() {
            by_pk.insert(document.key.value.clone(), Value::from(position));
        }
        let pk_path = self.layout.pk_index_path(name);
        if claim_path(&pk_path, name, claimed_paths, &mut plan.warnings) {
            plan.files.push(PlannedFile {
                path: pk_path,
                bytes: serialize(&Value::Object(by_pk))?,
            });
        }

        for fk_index in indexes.fk.iter().filter(|fk| fk.parent == name) {
            cancel.check()?;

            let child_rows = raw.rows(&fk_index.child);
            let mut content = Map::new();
            for (parent_key, positions) in &fk_index.rows_by_key {
                let child_keys: Vec<Value> = positions
                    .iter()
                    .filter_map(|&position| {
                        child_rows.iter().find(|row| row.row_index == position)
                    })
                    .filter_map(|row| {
                        row.pk
                            .as_ref()
                            .and_then(|pk| canonicalize_key(pk).ok())
                            .map(|key| Value::from(key.value))
                    })
                    .collect();
                content.insert(parent_key.value.clone(), Value::Array(child_keys));
            }

            let fk_path = self
                .layout
                .fk_index_path(name, &fk_index.child, &fk_index.field);
            if claim_path(&fk_path, name, claimed_paths, &mut plan.warnings) {
                plan.files.push(PlannedFile {
                    path: fk_path,
                    bytes: serialize(&Value::Object(content))?,
                });
            }
        }

        Ok(())
    }
}

/// Registers a path, rejecting case-insensitive duplicates.
fn claim_path(
    path: &str,
    entity: &str,
    claimed_paths: &mut HashSet<String>,
    warnings: &mut Vec<Warning>,
) -> bool {
    if claimed_paths.insert(path.to_ascii_lowercase()) {
        true
    } else {
        warnings.push(
            Warning::error(
                WarningCode::OutputBlobPathCollision,
                format!("output path '{}' is produced more than once", path),
            )
            .with_entity(entity.to_string())
            .with_path(path.to_string()),
        );
        false
    }
}

fn serialize(value: &Value) -> Result<Vec<u8>, OutputError> {
    canonical_json::to_string(value)
        .map(String::into_bytes)
        .map_err(|err| OutputError::Serialize(format!("{:?}", err)))
}
