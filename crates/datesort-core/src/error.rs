use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Run-level failures. Any of these stops `organize`.
#[derive(Debug, Error)]
pub enum OrganizeError {
    #[error("source {} does not exist", .0.display())]
    SourceMissing(PathBuf),

    #[error("{} is not a directory", .0.display())]
    SourceNotDirectory(PathBuf),

    #[error("failed to open source {}: {source}", .path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl OrganizeError {
    /// True for errors caused by bad flags rather than by I/O.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            OrganizeError::SourceMissing(_) | OrganizeError::SourceNotDirectory(_)
        )
    }
}

/// Per-file copy failures. These are reported and the batch moves on.
#[derive(Debug, Error)]
pub enum CopyError {
    #[error("non-regular source file {} ({kind})", .path.display())]
    NonRegularSource { path: PathBuf, kind: &'static str },

    #[error("non-regular destination file {} ({kind})", .path.display())]
    NonRegularDestination { path: PathBuf, kind: &'static str },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CopyError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> CopyError {
        let path = path.into();
        move |source| CopyError::Io { path, source }
    }
}
