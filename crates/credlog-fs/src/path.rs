//! # Path Checks
//!
//! `stat` can fail for reasons other than the path being missing. Treating
//! every failure as "absent" would let a transient permission problem look
//! like an empty log and get overwritten, so [`path_exists`] has three
//! outcomes: `Ok(true)`, `Ok(false)`, and `Err(FsError::Indeterminate)`.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::FsError;

/// Check whether `path` exists.
///
/// Returns `Ok(false)` only when the OS reports `NotFound`. Any other
/// failure is [`FsError::Indeterminate`].
pub fn path_exists(path: impl AsRef<Path>) -> Result<bool, FsError> {
    let path = path.as_ref();
    match fs::metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(source) => Err(FsError::Indeterminate {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Succeeds only if it was positively verified that `path` exists.
pub fn assert_path_exists(path: impl AsRef<Path>) -> Result<(), FsError> {
    let path = path.as_ref();
    if path_exists(path)? {
        Ok(())
    } else {
        Err(FsError::PathAbsent(path.to_path_buf()))
    }
}

/// Create `path` as a directory readable only by the owner (`0o700`),
/// including missing parents. Succeeds without changes if it already exists.
pub fn ensure_directory_exists(path: impl AsRef<Path>) -> Result<(), FsError> {
    let path = path.as_ref();
    if path_exists(path)? {
        return Ok(());
    }

    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder.create(path).map_err(|e| FsError::io(path, e))?;
    tracing::debug!(path = %path.display(), "created storage directory");
    Ok(())
}
