use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use rescomp_core::{Warning, WarningCode};

use crate::model::{
    ChildRelationship, Direction, Entity, Manifest, OrderBy, OutputIndexSpec, OutputSpec,
};

/// Result of a manifest load attempt.
#[derive(Debug)]
pub struct ManifestLoadResult {
    /// The loaded manifest; `None` when loading failed outright.
    pub manifest: Option<Manifest>,
    /// Warnings produced while loading.
    pub warnings: Vec<Warning>,
}

impl ManifestLoadResult {
    /// True when any warning has `Error` severity.
    pub fn has_errors(&self) -> bool {
        rescomp_core::has_errors(&self.warnings)
    }
}

/// Loads manifests from YAML files.
///
/// Loading is deliberately tolerant: unknown keys are ignored and absent
/// fields map to empty defaults, so that a structurally broken manifest
/// still produces a model the validator can report on field by field.
#[derive(Debug, Default)]
pub struct ManifestLoader;

impl ManifestLoader {
    /// Creates a loader.
    pub fn new() -> Self {
        Self
    }

    /// Reads and parses the manifest at `path`.
    pub fn load(&self, path: &Path) -> ManifestLoadResult {
        let mut warnings = Vec::new();

        if path.as_os_str().is_empty() {
            warnings.push(Warning::error(
                WarningCode::InvalidManifest,
                "manifest path is required",
            ));
            return ManifestLoadResult {
                manifest: None,
                warnings,
            };
        }

        let yaml = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                warnings.push(Warning::error(
                    WarningCode::InvalidManifest,
                    format!("failed to read manifest {}: {}", path.display(), err),
                ));
                return ManifestLoadResult {
                    manifest: None,
                    warnings,
                };
            }
        };

        let dto: ManifestDto = match serde_yaml::from_str(&yaml) {
            Ok(dto) => dto,
            Err(err) => {
                warnings.push(Warning::error(
                    WarningCode::InvalidManifest,
                    format!("failed to parse manifest YAML: {}", err),
                ));
                return ManifestLoadResult {
                    manifest: None,
                    warnings,
                };
            }
        };

        ManifestLoadResult {
            manifest: Some(map_manifest(dto)),
            warnings,
        }
    }
}

fn map_manifest(dto: ManifestDto) -> Manifest {
    let mut entities = BTreeMap::new();
    for (name, entity_dto) in dto.entities.unwrap_or_default() {
        let entity_dto = entity_dto.unwrap_or_default();
        entities.insert(
            name.clone(),
            Entity {
                name,
                file: entity_dto.file.unwrap_or_default(),
                primary_key: entity_dto.pk.unwrap_or_default(),
                is_root: entity_dto.root.unwrap_or(false),
                slug_field: entity_dto.slug_field.filter(|s| !s.is_empty()),
                order_by: entity_dto.order_by.map(map_order_by),
                children: entity_dto
                    .children
                    .unwrap_or_default()
                    .into_iter()
                    .map(map_child)
                    .collect(),
                output: entity_dto.output.map(map_output),
            },
        );
    }
    Manifest { entities }
}

fn map_child(dto: ChildDto) -> ChildRelationship {
    ChildRelationship {
        entity: dto.entity.unwrap_or_default(),
        output_field: dto.r#as.filter(|s| !s.is_empty()),
        fk_field: dto.fk.and_then(|fk| fk.field).unwrap_or_default(),
        order_by: dto.order_by.map(map_order_by),
        max_depth: dto.max_depth,
    }
}

fn map_order_by(dto: OrderByDto) -> OrderBy {
    OrderBy {
        field: dto.field.unwrap_or_default(),
        direction: dto.direction.as_deref().and_then(parse_direction),
    }
}

fn map_output(dto: OutputDto) -> OutputSpec {
    OutputSpec {
        blob_template: dto.blob_template.unwrap_or_default(),
        index: dto.index.map(|index| OutputIndexSpec {
            blob: index.blob.unwrap_or_default(),
            fields: index.fields.unwrap_or_default(),
        }),
    }
}

fn parse_direction(raw: &str) -> Option<Direction> {
    if raw.eq_ignore_ascii_case("asc") {
        Some(Direction::Asc)
    } else if raw.eq_ignore_ascii_case("desc") {
        Some(Direction::Desc)
    } else {
        None
    }
}

#[derive(Debug, Deserialize)]
struct ManifestDto {
    entities: Option<BTreeMap<String, Option<EntityDto>>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntityDto {
    file: Option<String>,
    pk: Option<String>,
    root: Option<bool>,
    slug_field: Option<String>,
    order_by: Option<OrderByDto>,
    children: Option<Vec<ChildDto>>,
    output: Option<OutputDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChildDto {
    entity: Option<String>,
    r#as: Option<String>,
    fk: Option<FkDto>,
    order_by: Option<OrderByDto>,
    max_depth: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct FkDto {
    field: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OrderByDto {
    field: Option<String>,
    direction: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OutputDto {
    blob_template: Option<String>,
    index: Option<OutputIndexDto>,
}

#[derive(Debug, Deserialize)]
struct OutputIndexDto {
    blob: Option<String>,
    fields: Option<Vec<String>>,
}
