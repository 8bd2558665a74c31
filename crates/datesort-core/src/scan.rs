use std::fs;
use std::path::Path;

use log::{debug, warn};
use walkdir::WalkDir;

use crate::classify;
use crate::media::ImageRecord;
use crate::ThrottledProgress;

/// Result of walking the source tree
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Files whose leading bytes look like an image, in walk order
    pub images: Vec<ImageRecord>,
    /// Regular files visited
    pub files_seen: u64,
    /// Entries that could not be visited or read
    pub warnings: Vec<String>,
}

/// Walk `root` recursively and collect every regular file that sniffs as an
/// image. `root` should already be absolute so recorded paths are too.
/// Symlinks to regular files are sniffed through the link even when the walk
/// does not follow links into directories.
///
/// An unreadable entry is logged, noted in `warnings` and skipped; the walk
/// carries on with its siblings.
pub fn scan_images(root: &Path, follow_links: bool, progress: &ThrottledProgress) -> ScanResult {
    let mut result = ScanResult::default();

    for entry in WalkDir::new(root).follow_links(follow_links) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                let msg = match e.path() {
                    Some(p) => format!("cannot walk {}: {}", p.display(), e),
                    None => format!("cannot walk {}: {}", root.display(), e),
                };
                warn!("{}", msg);
                result.warnings.push(msg);
                continue;
            }
        };

        let path = entry.path();
        if entry.path_is_symlink() && !entry.file_type().is_dir() {
            match fs::metadata(path) {
                Ok(meta) if meta.is_file() => {}
                Ok(_) => continue,
                Err(e) => {
                    let msg = format!("broken symlink {}: {}", path.display(), e);
                    warn!("{}", msg);
                    result.warnings.push(msg);
                    continue;
                }
            }
        } else if !entry.file_type().is_file() {
            continue;
        }
        result.files_seen += 1;
        progress.report("scan", result.files_seen, 0, "Scanning for images");

        let head = match classify::read_head(path) {
            Ok(h) => h,
            Err(e) => {
                let msg = format!("cannot read {}: {}", path.display(), e);
                warn!("{}", msg);
                result.warnings.push(msg);
                continue;
            }
        };

        let Some(format) = classify::detect(&head) else {
            debug!("not an image: {}", path.display());
            continue;
        };

        let name = entry.file_name().to_os_string();
        debug!("found {} image {}", format, path.display());
        result
            .images
            .push(ImageRecord::new(name, path.to_path_buf(), format));
    }

    result
}
