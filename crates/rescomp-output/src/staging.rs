use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Scratch directory a run writes into before the output root is touched.
///
/// The scratch tree lives next to the final root with a `.tmp` suffix. On
/// `publish` the existing root (if any) is removed and the scratch tree is
/// renamed into place. An unpublished scratch tree is removed on drop, so a
/// failed run leaves the previous output intact.
#[derive(Debug)]
pub struct StagedRoot {
    scratch: PathBuf,
    target: PathBuf,
    published: bool,
}

impl StagedRoot {
    /// Creates an empty scratch directory for `target`.
    pub fn create(target: &Path) -> io::Result<Self> {
        let mut scratch = target.as_os_str().to_owned();
        scratch.push(".tmp");
        let scratch = PathBuf::from(scratch);

        if scratch.exists() {
            fs::remove_dir_all(&scratch)?;
        }
        fs::create_dir_all(&scratch)?;

        Ok(Self {
            scratch,
            target: target.to_path_buf(),
            published: false,
        })
    }

    /// The scratch directory files are written into.
    pub fn path(&self) -> &Path {
        &self.scratch
    }

    /// Replaces the target root with the scratch tree.
    pub fn publish(mut self) -> io::Result<()> {
        if self.target.exists() {
            fs::remove_dir_all(&self.target)?;
        }
        fs::rename(&self.scratch, &self.target)?;
        self.published = true;
        Ok(())
    }
}

impl Drop for StagedRoot {
    fn drop(&mut self) {
        if !self.published {
            let _ = fs::remove_dir_all(&self.scratch);
        }
    }
}
