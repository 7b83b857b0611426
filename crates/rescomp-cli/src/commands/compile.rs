//! Compile command implementation.

use rescomp_core::CancelFlag;
use rescomp_engine::{Engine, RunOptions};
use serde_json::json;

use crate::output;

pub fn run(
    manifest: String,
    raw_dir: String,
    out: String,
    max_depth: Option<u32>,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut options = RunOptions::new(manifest, raw_dir, out);
    if let Some(depth) = max_depth {
        options.max_depth = depth;
    }

    let report = Engine::new().run(&options, &CancelFlag::new())?;

    if json_output {
        let summary = json!({
            "succeeded": !report.has_errors(),
            "documents": report.documents,
            "files_written": report.files_written,
            "warnings": report.warnings,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        if !report.warnings.is_empty() {
            output::print_table_header();
            for warning in &report.warnings {
                println!("{}", output::format_table_row(warning));
            }
        }
        if report.has_errors() {
            println!("Compilation failed; output unchanged.");
        } else {
            println!(
                "Compiled {} documents into {} files.",
                report.documents, report.files_written
            );
        }
    }

    if report.has_errors() {
        std::process::exit(1);
    }

    Ok(())
}
