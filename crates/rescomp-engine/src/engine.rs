use tracing::{debug, info, warn};

use rescomp_assemble::DocumentAssembler;
use rescomp_core::{has_errors, CancelFlag, Warning};
use rescomp_index::{IndexBuilder, RawDataLoader};
use rescomp_manifest::{ManifestLoader, ManifestValidator};
use rescomp_output::{OutputPlanner, OutputWriter, StagedRoot};

use crate::error::EngineError;
use crate::options::RunOptions;
use crate::report::RunReport;

/// Runs the full compilation pipeline.
#[derive(Debug, Default)]
pub struct Engine;

impl Engine {
    /// Creates an engine.
    pub fn new() -> Self {
        Self
    }

    /// Executes one compilation run.
    ///
    /// Phases run strictly in order and each phase is gated: any
    /// `Error`-severity warning stops the run and returns the report with
    /// nothing written. All output lands in a staged directory first; the
    /// output root is replaced only after every file was written.
    pub fn run(
        &self,
        options: &RunOptions,
        cancel: &CancelFlag,
    ) -> Result<RunReport, EngineError> {
        cancel.check()?;
        let mut warnings: Vec<Warning> = Vec::new();

        info!(manifest = %options.manifest_path.display(), "loading manifest");
        let loaded = ManifestLoader::new().load(&options.manifest_path);
        warnings.extend(loaded.warnings);
        let Some(manifest) = loaded.manifest else {
            return Ok(failed(warnings));
        };
        if has_errors(&warnings) {
            return Ok(failed(warnings));
        }

        warnings.extend(ManifestValidator::new().validate(&manifest));
        if has_errors(&warnings) {
            warn!("manifest validation failed");
            return Ok(failed(warnings));
        }

        debug!(raw_dir = %options.raw_dir.display(), "loading raw data");
        let raw = RawDataLoader::new().load(&manifest, &options.raw_dir, cancel)?;
        warnings.extend(raw.warnings);
        if has_errors(&warnings) {
            return Ok(failed(warnings));
        }

        let indexes = IndexBuilder::new().build(&manifest, &raw.data, cancel)?;
        warnings.extend(indexes.warnings.iter().cloned());
        if has_errors(&warnings) {
            return Ok(failed(warnings));
        }

        let assembly = DocumentAssembler::new().assemble(
            &manifest,
            &raw.data,
            &indexes,
            options.max_depth,
            cancel,
        )?;
        warnings.extend(assembly.warnings);
        if has_errors(&warnings) {
            return Ok(failed(warnings));
        }
        let documents = assembly.documents;
        debug!(documents = documents.len(), "assembly complete");

        let plan =
            OutputPlanner::new().plan(&manifest, &documents, &indexes, &raw.data, cancel)?;
        warnings.extend(plan.warnings);
        if has_errors(&warnings) {
            warn!("output planning failed, output root untouched");
            return Ok(RunReport {
                warnings,
                documents: documents.len(),
                files_written: 0,
            });
        }

        let staged = StagedRoot::create(&options.output_root)?;
        let files_written = OutputWriter::new().write_all(staged.path(), &plan.files, cancel)?;
        staged.publish()?;
        info!(
            files = files_written,
            output = %options.output_root.display(),
            "run complete"
        );

        Ok(RunReport {
            warnings,
            documents: documents.len(),
            files_written,
        })
    }
}

fn failed(warnings: Vec<Warning>) -> RunReport {
    RunReport {
        warnings,
        documents: 0,
        files_written: 0,
    }
}
