//! Key command implementation.

use rescomp_core::{canonicalize_key, Warning};
use serde_json::Value;

pub fn run(input: String) -> Result<(), Box<dyn std::error::Error>> {
    let value: Value = serde_json::from_str(&input)
        .map_err(|e| format!("input is not a JSON value: {}", e))?;
    let key = canonicalize_key(&value).map_err(|e| {
        let warning = Warning::from(e);
        format!("{:?}: {}", warning.code, warning.message)
    })?;

    println!("{:?} {}", key.kind, key.value);
    Ok(())
}
