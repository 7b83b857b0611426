use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use crate::warnings::{Warning, WarningCode};

/// Scalar kind of a canonical key.
///
/// The derived `Ord` (declaration order) participates in sibling ordering:
/// rows sort by `(kind, value)` when an order field mixes scalar types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum KeyKind {
    /// JSON string key.
    String,
    /// JSON number key, canonicalized to a decimal string.
    Number,
    /// JSON boolean key (`"true"` / `"false"`).
    Boolean,
}

/// Representation-independent canonical form of a JSON scalar.
///
/// Two decimal-equal JSON numbers always canonicalize to the same
/// `KeyValue` (`1`, `1.0`, `1.00` all become `Number("1")`; every zero,
/// including negative zero in fixed or exponential notation, becomes
/// `Number("0")`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct KeyValue {
    /// Scalar kind.
    pub kind: KeyKind,
    /// Canonical string form.
    pub value: String,
}

impl KeyValue {
    /// Constructs a key from already-canonical parts.
    pub fn new(kind: KeyKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

impl std::fmt::Display for KeyValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Error returned when a value cannot serve as a key.
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    /// The value is null, an object, or an array.
    #[error("invalid key type: {0}")]
    NotScalar(&'static str),
}

impl From<KeyError> for Warning {
    fn from(err: KeyError) -> Self {
        Warning::error(WarningCode::InvalidKey, err.to_string())
    }
}

/// Canonicalizes a JSON scalar into a [`KeyValue`].
///
/// Strings and booleans map directly; numbers parse as arbitrary-precision
/// decimal where possible, with trailing zeros trimmed and every zero mapped
/// to the literal `"0"`. Null, objects, and arrays are never valid keys.
pub fn canonicalize_key(value: &Value) -> Result<KeyValue, KeyError> {
    match value {
        Value::String(s) => Ok(KeyValue::new(KeyKind::String, s.clone())),
        Value::Bool(b) => Ok(KeyValue::new(
            KeyKind::Boolean,
            if *b { "true" } else { "false" },
        )),
        Value::Number(n) => Ok(KeyValue::new(
            KeyKind::Number,
            canonicalize_number(&n.to_string()),
        )),
        Value::Null => Err(KeyError::NotScalar("null")),
        Value::Object(_) => Err(KeyError::NotScalar("object")),
        Value::Array(_) => Err(KeyError::NotScalar("array")),
    }
}

fn canonicalize_number(raw: &str) -> String {
    let trimmed = raw.trim();

    let parsed = Decimal::from_str_exact(trimmed).or_else(|_| Decimal::from_scientific(trimmed));
    if let Ok(dec) = parsed {
        if dec == Decimal::ZERO {
            return "0".to_string();
        }
        let formatted = dec.normalize().to_string();
        return if formatted == "-0" {
            "0".to_string()
        } else {
            formatted
        };
    }

    // Out of decimal range; the raw text is the best canonical form we have,
    // except for negative zero spellings which still collapse to "0".
    if is_negative_zero_token(trimmed) {
        return "0".to_string();
    }
    trimmed.to_string()
}

fn is_negative_zero_token(raw: &str) -> bool {
    let Some(unsigned) = raw.strip_prefix('-') else {
        return false;
    };
    if unsigned.is_empty() {
        return false;
    }

    let (base, exponent) = match unsigned.find(['e', 'E']) {
        Some(idx) => (&unsigned[..idx], Some(&unsigned[idx + 1..])),
        None => (unsigned, None),
    };

    if !is_zero_decimal(base) {
        return false;
    }

    match exponent {
        None => true,
        Some(exp) => is_valid_exponent(exp),
    }
}

fn is_zero_decimal(value: &str) -> bool {
    let mut has_digit = false;
    for ch in value.chars() {
        match ch {
            '.' => continue,
            '0' => has_digit = true,
            _ => return false,
        }
    }
    has_digit
}

fn is_valid_exponent(value: &str) -> bool {
    let digits = value.strip_prefix(['+', '-']).unwrap_or(value);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}
