use serde_json::Value;

/// A dot-separated path into a JSON object, e.g. `fields.parentId`.
///
/// Paths resolve strictly through objects: a non-object value part-way
/// through the path yields no result. Array indexing is intentionally not
/// supported; keys live on object fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    raw: String,
    segments: Vec<String>,
}

impl FieldPath {
    /// Parses a field path from its dotted string form.
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let segments = raw
            .split('.')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        Self { raw, segments }
    }

    /// The original dotted form.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// True when the path has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Resolves the path against a JSON value.
    pub fn resolve<'a>(&self, value: &'a Value) -> Option<&'a Value> {
        if self.segments.is_empty() {
            return None;
        }
        let mut current = value;
        for segment in &self.segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }
}

impl std::fmt::Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}
