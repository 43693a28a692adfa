//! # Filesystem Error Types

use std::path::PathBuf;

use thiserror::Error;

/// Errors from the persistence primitives.
#[derive(Error, Debug)]
pub enum FsError {
    /// An I/O operation on `path` failed.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// The path being operated on.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The path was verified not to exist.
    #[error("path {} does not exist", .0.display())]
    PathAbsent(PathBuf),

    /// Whether the path exists could not be determined (permission denied,
    /// a non-directory in the middle of the path, ...). Never means absent.
    #[error("could not determine whether {} exists: {source}", path.display())]
    Indeterminate {
        /// The path being checked.
        path: PathBuf,
        /// The error returned by `stat`.
        #[source]
        source: std::io::Error,
    },

    /// The OS random number generator failed.
    #[error("entropy source failed: {0}")]
    Entropy(String),
}

impl FsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
