use std::collections::HashMap;

use regex::Regex;

use rescomp_core::{Warning, WarningCode};

use crate::model::{Manifest, OrderBy};

const ENTITY_NAME_PATTERN: &str = r"^[A-Za-z][A-Za-z0-9_.-]*$";

/// Structural validation of a loaded manifest.
///
/// Every violation is reported as an `Error`-severity warning; validation
/// never stops at the first problem so a broken manifest is diagnosed in one
/// pass.
#[derive(Debug)]
pub struct ManifestValidator {
    name_pattern: Regex,
}

impl Default for ManifestValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestValidator {
    /// Creates a validator.
    pub fn new() -> Self {
        Self {
            name_pattern: Regex::new(ENTITY_NAME_PATTERN).expect("invalid regex"),
        }
    }

    /// Validates the manifest, returning every violation found.
    pub fn validate(&self, manifest: &Manifest) -> Vec<Warning> {
        let mut warnings = Vec::new();

        if manifest.entities.is_empty() {
            warnings.push(Warning::error(
                WarningCode::InvalidManifest,
                "manifest must define at least one entity",
            ));
            return warnings;
        }

        // (child entity, fk field) -> first declaring parent. A second parent
        // declaring the same pair would silently lose its index, so it is
        // rejected outright.
        let mut fk_registrations: HashMap<(String, String), String> = HashMap::new();
        let mut seen_names: HashMap<String, String> = HashMap::new();

        for (name, entity) in &manifest.entities {
            // Entity folders and output paths are case-insensitive on some
            // filesystems, so names differing only by case are rejected.
            if let Some(first) = seen_names.insert(name.to_ascii_lowercase(), name.clone()) {
                warnings.push(
                    Warning::error(
                        WarningCode::InvalidManifest,
                        format!("duplicate entity name: '{}' collides with '{}'", name, first),
                    )
                    .with_entity(name.clone()),
                );
            }

            if !self.name_pattern.is_match(name) {
                warnings.push(
                    Warning::error(
                        WarningCode::InvalidManifest,
                        format!("entity name '{}' is not a valid identifier", name),
                    )
                    .with_entity(name.clone()),
                );
            }

            if entity.file.trim().is_empty() {
                warnings.push(
                    Warning::error(
                        WarningCode::MissingKey,
                        format!("entity '{}' must define a non-empty file name", name),
                    )
                    .with_entity(name.clone()),
                );
            }

            if entity.primary_key.trim().is_empty() {
                warnings.push(
                    Warning::error(
                        WarningCode::MissingKey,
                        format!("entity '{}' must define a non-empty primary key", name),
                    )
                    .with_entity(name.clone()),
                );
            }

            validate_order_by(name, entity.order_by.as_ref(), &mut warnings);

            for child in &entity.children {
                if child.entity.is_empty() {
                    warnings.push(
                        Warning::error(
                            WarningCode::InvalidManifest,
                            format!(
                                "entity '{}' has a child relationship with no entity specified",
                                name
                            ),
                        )
                        .with_entity(name.clone()),
                    );
                } else if !manifest.entities.contains_key(&child.entity) {
                    warnings.push(
                        Warning::error(
                            WarningCode::InvalidManifest,
                            format!(
                                "entity '{}' references missing child entity '{}'",
                                name, child.entity
                            ),
                        )
                        .with_entity(name.clone()),
                    );
                }

                if child.fk_field.trim().is_empty() {
                    warnings.push(
                        Warning::error(
                            WarningCode::MissingForeignKey,
                            format!(
                                "entity '{}' must define a foreign key field for child '{}'",
                                name, child.entity
                            ),
                        )
                        .with_entity(name.clone()),
                    );
                } else if !child.entity.is_empty() {
                    let pair = (child.entity.clone(), child.fk_field.clone());
                    match fk_registrations.get(&pair) {
                        Some(first_parent) if first_parent != name => {
                            warnings.push(
                                Warning::error(
                                    WarningCode::InvalidManifest,
                                    format!(
                                        "relationship to ('{}', '{}') is declared by both '{}' and '{}'",
                                        pair.0, pair.1, first_parent, name
                                    ),
                                )
                                .with_entity(name.clone()),
                            );
                        }
                        Some(_) => {}
                        None => {
                            fk_registrations.insert(pair, name.clone());
                        }
                    }
                }

                validate_order_by(name, child.order_by.as_ref(), &mut warnings);
            }

            if let Some(output) = &entity.output {
                if output.blob_template.trim().is_empty() {
                    warnings.push(
                        Warning::error(
                            WarningCode::InvalidManifest,
                            format!("entity '{}' declares an output with an empty template", name),
                        )
                        .with_entity(name.clone()),
                    );
                }
                if let Some(index) = &output.index {
                    if index.blob.trim().is_empty() || index.fields.is_empty() {
                        warnings.push(
                            Warning::error(
                                WarningCode::InvalidManifest,
                                format!(
                                    "entity '{}' declares an output index without a blob path or fields",
                                    name
                                ),
                            )
                            .with_entity(name.clone()),
                        );
                    }
                }
            }
        }

        warnings
    }
}

fn validate_order_by(entity: &str, order_by: Option<&OrderBy>, warnings: &mut Vec<Warning>) {
    let Some(order_by) = order_by else {
        return;
    };

    if order_by.field.trim().is_empty() {
        warnings.push(
            Warning::error(
                WarningCode::OrderByFieldMissing,
                format!("entity '{}' defines orderBy without a field", entity),
            )
            .with_entity(entity.to_string()),
        );
    }

    if order_by.direction.is_none() {
        warnings.push(
            Warning::error(
                WarningCode::InvalidManifest,
                format!(
                    "entity '{}' defines orderBy with an invalid or missing direction",
                    entity
                ),
            )
            .with_entity(entity.to_string()),
        );
    }
}
