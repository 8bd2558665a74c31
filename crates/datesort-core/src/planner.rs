use std::collections::HashSet;
use std::fs::DirBuilder;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::error::OrganizeError;

/// `<root>/YYYY/MM/DD`, zero padded.
pub fn date_dir(root: &Path, (y, m, d): (i32, u32, u32)) -> PathBuf {
    root.join(format!("{:04}", y))
        .join(format!("{:02}", m))
        .join(format!("{:02}", d))
}

/// Creates destination directories, each at most once per run.
#[derive(Debug, Default)]
pub struct DirPlanner {
    seen: HashSet<PathBuf>,
    created: u64,
}

impl DirPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure `dir` exists, creating missing parents with mode 0755.
    /// In dry-run mode the directory is only reported.
    pub fn ensure(&mut self, dir: &Path, dry_run: bool) -> Result<(), OrganizeError> {
        if self.seen.contains(dir) {
            return Ok(());
        }
        if dir.is_dir() {
            debug!("directory exists: {}", dir.display());
        } else if dry_run {
            info!("[dry run] would create {}", dir.display());
        } else {
            create_dir_all(dir).map_err(|source| OrganizeError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;
            info!("created {}", dir.display());
            self.created += 1;
        }
        self.seen.insert(dir.to_path_buf());
        Ok(())
    }

    /// Directories actually created so far
    pub fn created(&self) -> u64 {
        self.created
    }
}

#[cfg(unix)]
fn create_dir_all(dir: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    DirBuilder::new().recursive(true).mode(0o755).create(dir)
}

#[cfg(not(unix))]
fn create_dir_all(dir: &Path) -> io::Result<()> {
    DirBuilder::new().recursive(true).create(dir)
}
