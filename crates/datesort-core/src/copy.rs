use std::fs::{self, File, Metadata};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use log::debug;

use crate::error::CopyError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    /// Bytes written to the destination
    Copied(u64),
    /// Source and destination are the same file; nothing was touched
    SameFile,
}

/// Copy `src` to `dst` byte for byte.
///
/// The source must be a regular file. An existing destination must also be a
/// regular file and is truncated before writing, unless it is the source
/// itself, in which case this is a no-op. The data is synced to disk before
/// returning. A copy cut short leaves a partial destination behind.
pub fn copy_file(src: &Path, dst: &Path, keep_mtime: bool) -> Result<CopyOutcome, CopyError> {
    let src_meta = fs::metadata(src).map_err(CopyError::io(src))?;
    if !src_meta.is_file() {
        return Err(CopyError::NonRegularSource {
            path: src.to_path_buf(),
            kind: file_kind(&src_meta),
        });
    }

    match fs::metadata(dst) {
        Ok(dst_meta) => {
            if !dst_meta.is_file() {
                return Err(CopyError::NonRegularDestination {
                    path: dst.to_path_buf(),
                    kind: file_kind(&dst_meta),
                });
            }
            if same_file(src, &src_meta, dst, &dst_meta) {
                return Ok(CopyOutcome::SameFile);
            }
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(CopyError::Io { path: dst.to_path_buf(), source: e }),
    }

    let written = copy_contents(src, dst)?;

    if keep_mtime {
        let mtime = filetime::FileTime::from_last_modification_time(&src_meta);
        if let Err(e) = filetime::set_file_mtime(dst, mtime) {
            debug!("could not set mtime on {}: {}", dst.display(), e);
        }
    }

    Ok(CopyOutcome::Copied(written))
}

fn copy_contents(src: &Path, dst: &Path) -> Result<u64, CopyError> {
    let mut input = File::open(src).map_err(CopyError::io(src))?;
    let output = File::create(dst).map_err(CopyError::io(dst))?;
    let mut writer = BufWriter::new(output);

    let written = io::copy(&mut input, &mut writer).map_err(CopyError::io(dst))?;
    writer.flush().map_err(CopyError::io(dst))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(CopyError::io(dst))?;
    Ok(written)
}

#[cfg(unix)]
fn same_file(_src: &Path, a: &Metadata, _dst: &Path, b: &Metadata) -> bool {
    use std::os::unix::fs::MetadataExt;
    a.dev() == b.dev() && a.ino() == b.ino()
}

#[cfg(not(unix))]
fn same_file(src: &Path, _a: &Metadata, dst: &Path, _b: &Metadata) -> bool {
    match (fs::canonicalize(src), fs::canonicalize(dst)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn file_kind(meta: &Metadata) -> &'static str {
    let ft = meta.file_type();
    if ft.is_dir() {
        return "directory";
    }
    if ft.is_symlink() {
        return "symlink";
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::FileTypeExt;
        if ft.is_block_device() {
            return "block device";
        }
        if ft.is_char_device() {
            return "character device";
        }
        if ft.is_fifo() {
            return "fifo";
        }
        if ft.is_socket() {
            return "socket";
        }
    }
    "special file"
}
