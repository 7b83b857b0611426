use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use rescomp_core::{CancelFlag, Cancelled};

use crate::planner::PlannedFile;

/// Errors that abort the output phase.
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// Filesystem operation failed.
    #[error("output i/o error: {0}")]
    Io(#[from] io::Error),
    /// The run was cancelled.
    #[error(transparent)]
    Cancelled(#[from] Cancelled),
    /// Canonical JSON serialization failed.
    #[error("canonical serialization failed: {0}")]
    Serialize(String),
}

/// Writes planned files under a root directory.
///
/// Each file is written to a `.tmp` sibling and renamed into place, so a
/// failure mid-write never leaves a partially written blob at its final
/// path.
#[derive(Debug, Default)]
pub struct OutputWriter;

impl OutputWriter {
    /// Creates a writer.
    pub fn new() -> Self {
        Self
    }

    /// Writes every planned file under `root`, returning the file count.
    pub fn write_all(
        &self,
        root: &Path,
        files: &[PlannedFile],
        cancel: &CancelFlag,
    ) -> Result<usize, OutputError> {
        for file in files {
            cancel.check()?;
            self.write_file(root, file)?;
        }
        Ok(files.len())
    }

    fn write_file(&self, root: &Path, file: &PlannedFile) -> Result<(), OutputError> {
        let target = root.join(&file.path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }

        let staged = StagedFile::begin(&target)?;
        staged.commit(&file.bytes)?;
        Ok(())
    }
}

/// Temp-file guard for a single blob. The temp file is removed on drop
/// unless the rename into place succeeded.
struct StagedFile {
    temp: PathBuf,
    target: PathBuf,
    committed: bool,
}

impl StagedFile {
    fn begin(target: &Path) -> io::Result<Self> {
        let mut temp = target.as_os_str().to_owned();
        temp.push(".tmp");
        Ok(Self {
            temp: PathBuf::from(temp),
            target: target.to_path_buf(),
            committed: false,
        })
    }

    fn commit(mut self, bytes: &[u8]) -> io::Result<()> {
        {
            let mut handle = fs::File::create(&self.temp)?;
            handle.write_all(bytes)?;
            handle.sync_all()?;
        }
        fs::rename(&self.temp, &self.target)?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.temp);
        }
    }
}
