use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use serde_json::Value;

use rescomp_core::{CancelFlag, Cancelled, FieldPath, Warning, WarningCode};
use rescomp_manifest::Manifest;

/// One row of raw entity data.
#[derive(Debug, Clone)]
pub struct RawRow {
    /// Owning entity name.
    pub entity: String,
    /// Position in the source array; defines the default sibling order.
    pub row_index: usize,
    /// The original JSON value (an object for well-formed rows).
    pub value: Value,
    /// Value extracted at the entity's primary key path, unvalidated.
    pub pk: Option<Value>,
}

/// Immutable raw data for a whole run, keyed by entity name.
#[derive(Debug, Clone, Default)]
pub struct RawData {
    /// Rows per entity, in source order.
    pub sets: BTreeMap<String, Vec<RawRow>>,
}

impl RawData {
    /// Rows for an entity; empty when the entity loaded no rows.
    pub fn rows(&self, entity: &str) -> &[RawRow] {
        self.sets.get(entity).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Result of loading all declared raw data files.
#[derive(Debug)]
pub struct RawLoadResult {
    /// The loaded rows.
    pub data: RawData,
    /// Warnings produced while loading.
    pub warnings: Vec<Warning>,
}

impl RawLoadResult {
    /// True when any warning has `Error` severity.
    pub fn has_errors(&self) -> bool {
        rescomp_core::has_errors(&self.warnings)
    }
}

/// Fatal raw-loading failures.
///
/// A missing or malformed data file is a semantic problem reported as a
/// warning; only cancellation and unexpected I/O failures abort the phase.
#[derive(Debug, thiserror::Error)]
pub enum RawLoadError {
    /// Underlying I/O failure other than a missing file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The run was cancelled.
    #[error(transparent)]
    Cancelled(#[from] Cancelled),
}

/// Loads one JSON array-of-objects file per declared entity.
#[derive(Debug, Default)]
pub struct RawDataLoader;

impl RawDataLoader {
    /// Creates a loader.
    pub fn new() -> Self {
        Self
    }

    /// Loads raw data for every entity in the manifest, in entity-name order.
    pub fn load(
        &self,
        manifest: &Manifest,
        raw_dir: &Path,
        cancel: &CancelFlag,
    ) -> Result<RawLoadResult, RawLoadError> {
        let mut warnings = Vec::new();
        let mut sets = BTreeMap::new();

        for (name, entity) in &manifest.entities {
            cancel.check()?;

            let path = raw_dir.join(&entity.file);
            let text = match fs::read_to_string(&path) {
                Ok(text) => text,
                Err(err) if err.kind() == io::ErrorKind::NotFound => {
                    warnings.push(
                        Warning::error(
                            WarningCode::RawFileNotFound,
                            format!("raw data file not found: {}", path.display()),
                        )
                        .with_entity(name.clone()),
                    );
                    sets.insert(name.clone(), Vec::new());
                    continue;
                }
                Err(err) => return Err(err.into()),
            };

            let root: Value = match serde_json::from_str(&text) {
                Ok(value) => value,
                Err(err) => {
                    warnings.push(
                        Warning::error(
                            WarningCode::RawFileInvalidJson,
                            format!("failed to parse {}: {}", path.display(), err),
                        )
                        .with_entity(name.clone()),
                    );
                    sets.insert(name.clone(), Vec::new());
                    continue;
                }
            };

            let Value::Array(items) = root else {
                warnings.push(
                    Warning::error(
                        WarningCode::RawRootNotArray,
                        format!("root of {} must be a JSON array", entity.file),
                    )
                    .with_entity(name.clone()),
                );
                sets.insert(name.clone(), Vec::new());
                continue;
            };

            let pk_path = FieldPath::parse(entity.primary_key.as_str());
            let mut rows = Vec::with_capacity(items.len());
            for (row_index, item) in items.into_iter().enumerate() {
                cancel.check()?;

                if !item.is_object() {
                    warnings.push(
                        Warning::error(
                            WarningCode::RawRowNotObject,
                            format!("row {} of {} is not a JSON object", row_index, entity.file),
                        )
                        .with_entity(name.clone())
                        .with_path(format!("[{}]", row_index)),
                    );
                    continue;
                }

                let pk = pk_path.resolve(&item).cloned();
                rows.push(RawRow {
                    entity: name.clone(),
                    row_index,
                    value: item,
                    pk,
                });
            }

            sets.insert(name.clone(), rows);
        }

        Ok(RawLoadResult {
            data: RawData { sets },
            warnings,
        })
    }
}
