use serde::Serialize;

/// Severity of a compiler warning.
///
/// Any `Error`-severity warning anywhere in a run aborts it with no output
/// persisted. `Warning` severity allows the run to continue with best-effort
/// results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    /// Run continues; the affected row/branch is handled best-effort.
    Warning,
    /// Run fails; no output is persisted.
    Error,
}

/// Stable warning codes, grouped by the phase that emits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WarningCode {
    /// Manifest failed to load or violates a structural rule.
    InvalidManifest,
    /// An entity is missing its file or primary key declaration.
    MissingKey,
    /// A child relationship is missing its foreign key field.
    MissingForeignKey,
    /// A declared order field is absent or invalid.
    OrderByFieldMissing,
    /// A declared raw data file does not exist.
    RawFileNotFound,
    /// A raw data file is not valid JSON.
    RawFileInvalidJson,
    /// A raw data file's root value is not an array.
    RawRootNotArray,
    /// A raw row is not a JSON object.
    RawRowNotObject,
    /// A value is not a valid key scalar (null, object, or array).
    InvalidKey,
    /// A row has no value at its entity's primary key path.
    MissingPk,
    /// A row's primary key value cannot be canonicalized.
    InvalidPkType,
    /// Two rows of one entity share a canonical primary key.
    DuplicatePk,
    /// A child row has no value at a relationship's foreign key path.
    MissingFk,
    /// A child row's foreign key value cannot be canonicalized.
    InvalidFkType,
    /// An entity re-appeared as its own descendant during assembly.
    CycleDetected,
    /// A relationship chain exceeded the effective maximum depth.
    MaxDepthExceeded,
    /// Two planned output files resolved to the same path.
    OutputBlobPathCollision,
    /// An output template token is empty, unterminated, or unresolvable.
    OutputTemplateMissingToken,
    /// An output template token resolved to a non-scalar or unsafe value.
    OutputTemplateTokenNotScalar,
    /// A projected index field is absent from a compiled document.
    OutputIndexFieldMissing,
}

/// A single diagnostic produced by a compilation phase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Warning {
    /// Stable code identifying the condition.
    pub code: WarningCode,
    /// Whether the run may continue.
    pub severity: Severity,
    /// Human-readable description.
    pub message: String,
    /// Entity the warning applies to, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    /// JSON path or output path the warning applies to, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Warning {
    /// Creates an `Error`-severity warning.
    pub fn error(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: Severity::Error,
            message: message.into(),
            entity: None,
            path: None,
        }
    }

    /// Creates a `Warning`-severity warning.
    pub fn warning(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: Severity::Warning,
            message: message.into(),
            entity: None,
            path: None,
        }
    }

    /// Attaches the entity name the warning refers to.
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// Attaches the JSON path or output path the warning refers to.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Returns true when this warning fails the run.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Returns true when any warning in the slice has `Error` severity.
pub fn has_errors(warnings: &[Warning]) -> bool {
    warnings.iter().any(Warning::is_error)
}
