use rescomp_core::Warning;

/// Outcome of a compilation run that ran to a decision.
///
/// A report with any `Error`-severity warning means the run failed and the
/// output root was left untouched; `files_written` is zero in that case.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Every warning collected across all phases, in phase order.
    pub warnings: Vec<Warning>,
    /// Number of compiled top-level documents.
    pub documents: usize,
    /// Number of output files published to the output root.
    pub files_written: usize,
}

impl RunReport {
    /// True when the run failed and nothing was persisted.
    pub fn has_errors(&self) -> bool {
        rescomp_core::has_errors(&self.warnings)
    }
}
