use std::path::PathBuf;

/// Global relationship depth ceiling applied when the manifest declares
/// none.
pub const DEFAULT_MAX_DEPTH: u32 = 8;

/// Configuration for one compilation run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Path of the YAML manifest.
    pub manifest_path: PathBuf,
    /// Directory holding the raw JSON data files.
    pub raw_dir: PathBuf,
    /// Directory the compiled output replaces on success.
    pub output_root: PathBuf,
    /// Global depth ceiling for nested child assembly.
    pub max_depth: u32,
}

impl RunOptions {
    /// Creates options with the default depth ceiling.
    pub fn new(
        manifest_path: impl Into<PathBuf>,
        raw_dir: impl Into<PathBuf>,
        output_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            manifest_path: manifest_path.into(),
            raw_dir: raw_dir.into(),
            output_root: output_root.into(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
