//! Check command implementation.

use std::path::Path;

use rescomp_core::has_errors;
use rescomp_manifest::{ManifestLoader, ManifestValidator};

use crate::output;

pub fn run(manifest: String, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    let loaded = ManifestLoader::new().load(Path::new(&manifest));
    let mut warnings = loaded.warnings;
    if let Some(manifest) = &loaded.manifest {
        warnings.extend(ManifestValidator::new().validate(manifest));
    }

    if json_output {
        println!("{}", output::format_json(&warnings));
    } else if warnings.is_empty() {
        println!("Manifest OK.");
    } else {
        output::print_table_header();
        for warning in &warnings {
            println!("{}", output::format_table_row(warning));
        }
    }

    if has_errors(&warnings) {
        std::process::exit(1);
    }

    Ok(())
}
