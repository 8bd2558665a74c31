use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::copy::{copy_file, CopyOutcome};
use crate::error::OrganizeError;
use crate::media::ImageRecord;
use crate::planner::{date_dir, DirPlanner};
use crate::{ThrottledProgress, UndatedPolicy};

/// Result of the write phase.
#[derive(Debug, Default)]
pub struct WriteResult {
    /// Destination chosen for each record that takes part, in input order
    pub assignments: Vec<(usize, PathBuf)>,
    pub copied: u64,
    pub planned: u64,
    pub unchanged: u64,
    pub failed: u64,
    pub skipped_undated: u64,
    pub bytes_copied: u64,
    pub dirs_created: u64,
    pub warnings: Vec<String>,
}

/// Assign destination paths and create their directories, then copy.
///
/// Directory creation failures abort; copy failures are reported and the
/// remaining files are still copied.
pub fn write_output(
    images: &[ImageRecord],
    destination: &Path,
    undated: UndatedPolicy,
    dry_run: bool,
    keep_mtime: bool,
    progress: &ThrottledProgress,
) -> Result<WriteResult, OrganizeError> {
    let mut result = WriteResult::default();

    // Phase 1: destination directories
    let mut planner = DirPlanner::new();
    for (idx, image) in images.iter().enumerate() {
        if image.date.is_none() && undated == UndatedPolicy::Skip {
            debug!("skipping undated {}", image.path.display());
            result.skipped_undated += 1;
            continue;
        }
        let dir = date_dir(destination, image.ymd());
        planner.ensure(&dir, dry_run)?;
        result.assignments.push((idx, dir.join(&image.name)));
    }
    result.dirs_created = planner.created();

    if result.skipped_undated > 0 {
        info!(
            "{} image(s) have no capture date and were left out",
            result.skipped_undated
        );
    }

    // Phase 2: copy
    let total = result.assignments.len() as u64;
    for (n, (idx, dest)) in result.assignments.iter().enumerate() {
        let src = &images[*idx].path;

        if dry_run {
            info!("[dry run] would copy {} to {}", src.display(), dest.display());
            result.planned += 1;
        } else {
            match copy_file(src, dest, keep_mtime) {
                Ok(CopyOutcome::Copied(bytes)) => {
                    info!(
                        "copied {} {} to {}",
                        images[*idx].format,
                        src.display(),
                        dest.display()
                    );
                    result.copied += 1;
                    result.bytes_copied += bytes;
                }
                Ok(CopyOutcome::SameFile) => {
                    debug!("{} is already in place", dest.display());
                    result.unchanged += 1;
                }
                Err(e) => {
                    let msg = format!(
                        "failed to copy {} to {}: {}",
                        src.display(),
                        dest.display(),
                        e
                    );
                    warn!("{}", msg);
                    result.warnings.push(msg);
                    result.failed += 1;
                }
            }
        }

        progress.report("copy", n as u64, total, "Copying images");
    }

    Ok(result)
}
