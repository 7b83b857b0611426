use std::path::Path;

use serde_json::Value;

use rescomp_core::{Warning, WarningCode};

/// Renders manifest-declared path templates against compiled documents.
///
/// `{token}` placeholders resolve against the document's top-level fields,
/// then a nested `fields` sub-object, then (for the `slug` token) the
/// entity's declared slug field. The rendered result must be a safe
/// relative path: unsafe values are rejected, never sanitized.
#[derive(Debug, Default)]
pub struct TemplateRenderer;

impl TemplateRenderer {
    /// Creates a renderer.
    pub fn new() -> Self {
        Self
    }

    /// Renders `template` into an output path for `payload`.
    pub fn render_path(
        &self,
        template: &str,
        payload: &Value,
        slug_field: Option<&str>,
    ) -> Result<String, Warning> {
        if template.trim().is_empty() {
            return Err(Warning::error(
                WarningCode::OutputTemplateMissingToken,
                "output template is empty",
            ));
        }

        let mut rendered = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(start) = rest.find('{') {
            rendered.push_str(&rest[..start]);
            let after_brace = &rest[start + 1..];
            let Some(end) = after_brace.find('}') else {
                return Err(Warning::error(
                    WarningCode::OutputTemplateMissingToken,
                    format!("template token is not closed in '{}'", template),
                ));
            };

            let token = &after_brace[..end];
            if token.trim().is_empty() {
                return Err(Warning::error(
                    WarningCode::OutputTemplateMissingToken,
                    format!("template token is empty in '{}'", template),
                ));
            }

            let value = resolve_token(payload, token, slug_field)?;
            if is_unsafe_token_value(&value) {
                return Err(Warning::error(
                    WarningCode::OutputTemplateTokenNotScalar,
                    format!("template token '{}' contains unsafe path segments", token),
                )
                .with_path(value));
            }
            rendered.push_str(&value);
            rest = &after_brace[end + 1..];
        }
        rendered.push_str(rest);

        let rendered = rendered.replace('\\', "/");
        if !is_safe_relative_path(&rendered) {
            return Err(Warning::error(
                WarningCode::OutputTemplateMissingToken,
                format!("output path '{}' is not a safe relative path", rendered),
            )
            .with_path(rendered));
        }

        Ok(rendered)
    }
}

fn resolve_token(payload: &Value, token: &str, slug_field: Option<&str>) -> Result<String, Warning> {
    if let Some(value) = payload.get(token) {
        return scalar_string(value, token);
    }
    if let Some(value) = payload.get("fields").and_then(|fields| fields.get(token)) {
        return scalar_string(value, token);
    }
    if token == "slug" {
        if let Some(value) = slug_field.and_then(|field| payload.get(field)) {
            return scalar_string(value, token);
        }
    }

    Err(Warning::error(
        WarningCode::OutputTemplateMissingToken,
        format!("template token '{}' could not be resolved", token),
    ))
}

fn scalar_string(value: &Value, token: &str) -> Result<String, Warning> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(if *b { "true" } else { "false" }.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(Warning::error(
            WarningCode::OutputTemplateTokenNotScalar,
            format!("template token '{}' resolved to a non-scalar value", token),
        )),
    }
}

fn is_unsafe_token_value(value: &str) -> bool {
    value.contains('/') || value.contains('\\') || value == ".."
}

/// A safe relative path is non-empty, not absolute, and contains no `..`
/// segment.
pub(crate) fn is_safe_relative_path(path: &str) -> bool {
    if path.trim().is_empty() || Path::new(path).is_absolute() || path.starts_with('/') {
        return false;
    }
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .all(|segment| segment != "..")
}
