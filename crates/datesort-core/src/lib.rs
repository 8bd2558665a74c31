pub mod classify;
pub mod copy;
pub mod date;
pub mod error;
pub mod media;
pub mod planner;
pub mod scan;
pub mod writer;

#[cfg(test)]
pub(crate) mod testutil;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use log::info;
use serde::{Deserialize, Serialize};

pub use copy::{copy_file, CopyOutcome};
pub use error::{CopyError, OrganizeError};
pub use media::ImageRecord;

/// What to do with images that carry no capture date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UndatedPolicy {
    /// Leave them out of the date tree
    #[default]
    Skip,
    /// Put them under `0000/00/00`
    Zero,
}

fn default_source() -> PathBuf {
    PathBuf::from("./")
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizeOptions {
    #[serde(default = "default_source")]
    pub source: PathBuf,
    pub destination: PathBuf,
    #[serde(default = "default_true")]
    pub dry_run: bool,
    #[serde(default)]
    pub undated: UndatedPolicy,
    #[serde(default)]
    pub follow_links: bool,
    #[serde(default = "default_true")]
    pub keep_mtime: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrganizeResult {
    pub dry_run: bool,
    pub files_seen: u64,
    pub images_found: u64,
    pub dated: u64,
    pub undated: u64,
    pub files_copied: u64,
    /// Copies that would have happened (dry run only)
    pub files_planned: u64,
    /// Source and destination were already the same file
    pub files_unchanged: u64,
    pub files_failed: u64,
    pub dirs_created: u64,
    pub bytes_copied: u64,
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// Type alias for progress callback: `(stage, current, total, message)`.
/// A `total` of zero means the total is not known yet.
pub type ProgressCallback = dyn Fn(&str, u64, u64, &str) + Send + Sync;

/// Throttled progress reporter - emits at most every 200ms or on completion.
pub struct ThrottledProgress<'a> {
    inner: &'a ProgressCallback,
    last_emit: std::sync::Mutex<Instant>,
}

impl<'a> ThrottledProgress<'a> {
    pub fn new(inner: &'a ProgressCallback) -> Self {
        let start = Instant::now()
            .checked_sub(std::time::Duration::from_secs(1))
            .unwrap_or_else(Instant::now);
        Self {
            inner,
            last_emit: std::sync::Mutex::new(start),
        }
    }

    pub fn report(&self, stage: &str, current: u64, total: u64, message: &str) {
        let is_done = total > 0 && current + 1 >= total;
        if !is_done {
            let Ok(mut last) = self.last_emit.lock() else {
                return;
            };
            if last.elapsed().as_millis() < 200 {
                return;
            }
            *last = Instant::now();
        }
        (self.inner)(stage, current, total, message);
    }
}

/// Check that `source` is an existing, readable directory and return its
/// canonical form.
pub fn validate_source(source: &Path) -> Result<PathBuf, OrganizeError> {
    let meta = fs::metadata(source).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => OrganizeError::SourceMissing(source.to_path_buf()),
        _ => OrganizeError::SourceUnreadable {
            path: source.to_path_buf(),
            source: e,
        },
    })?;
    if !meta.is_dir() {
        return Err(OrganizeError::SourceNotDirectory(source.to_path_buf()));
    }

    let unreadable = |e: io::Error| OrganizeError::SourceUnreadable {
        path: source.to_path_buf(),
        source: e,
    };
    fs::read_dir(source).map_err(unreadable)?;
    fs::canonicalize(source).map_err(unreadable)
}

/// Run the whole pipeline: scan, date, plan, copy.
pub fn organize(
    options: &OrganizeOptions,
    progress_callback: &ProgressCallback,
) -> anyhow::Result<OrganizeResult> {
    let tp = ThrottledProgress::new(progress_callback);
    let t_total = Instant::now();

    let source = validate_source(&options.source)?;
    if options.dry_run {
        info!("dry run: nothing will be created or copied");
    }

    // Stage 1: find images
    let t = Instant::now();
    let scan = scan::scan_images(&source, options.follow_links, &tp);
    let mut images = scan.images;
    info!(
        "found {} image(s) among {} file(s) in {} ({:.2}s)",
        images.len(),
        scan.files_seen,
        source.display(),
        t.elapsed().as_secs_f64()
    );

    let mut result = OrganizeResult {
        dry_run: options.dry_run,
        files_seen: scan.files_seen,
        images_found: images.len() as u64,
        warnings: scan.warnings,
        ..Default::default()
    };
    if images.is_empty() {
        return Ok(result);
    }

    // Stage 2: capture dates
    let t = Instant::now();
    let total = images.len() as u64;
    for (n, image) in images.iter_mut().enumerate() {
        image.date = date::resolve_date(&image.path);
        tp.report("date", n as u64, total, "Reading EXIF");
    }
    result.dated = images.iter().filter(|i| i.date.is_some()).count() as u64;
    result.undated = total - result.dated;
    info!(
        "dates found: {}/{} ({:.2}s)",
        result.dated,
        total,
        t.elapsed().as_secs_f64()
    );

    // Stage 3: directories and copies
    let write = writer::write_output(
        &images,
        &options.destination,
        options.undated,
        options.dry_run,
        options.keep_mtime,
        &tp,
    )?;

    result.files_copied = write.copied;
    result.files_planned = write.planned;
    result.files_unchanged = write.unchanged;
    result.files_failed = write.failed;
    result.dirs_created = write.dirs_created;
    result.bytes_copied = write.bytes_copied;
    result.warnings.extend(write.warnings);

    info!("total: {:.2}s", t_total.elapsed().as_secs_f64());
    Ok(result)
}
