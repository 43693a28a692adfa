//! # Atomic File Replacement
//!
//! [`save_file`] writes content so that the target is only ever observed
//! holding the complete previous content or the complete new content:
//!
//! 1. Draw 16 bytes from the OS RNG and name a temp file
//!    `.credlog-tmp-<32 hex chars>` in the **same directory** as the target.
//!    Staying in one directory keeps the final `rename` on one filesystem,
//!    where POSIX guarantees it is atomic.
//! 2. Create it with `create_new` and mode `0o600`, write everything, fsync.
//! 3. `rename` it over the target, then fsync the directory so the rename
//!    itself survives power loss (unix only).
//!
//! The two steps are exposed separately as [`stage_file`] and
//! [`StagedFile::commit`]. A [`StagedFile`] dropped without committing
//! models a crash between the steps: its temp file stays behind and the
//! target is untouched. [`sweep_orphans`] removes such leftovers; the fixed
//! prefix makes them recognizable.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::FsError;

/// File-name prefix of every temp file created by this module.
pub const TEMP_FILE_PREFIX: &str = ".credlog-tmp-";

/// Bytes of randomness in a temp file name.
const TEMP_NAME_ENTROPY_BYTES: usize = 16;

/// Content written to a temp file next to its target, not yet visible at
/// the target path.
#[derive(Debug)]
#[must_use = "a staged file does nothing until committed"]
pub struct StagedFile {
    temp_path: PathBuf,
    target: PathBuf,
}

impl StagedFile {
    /// Where the content currently lives.
    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// The path the content will replace on commit.
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Atomically replace the target with the staged content.
    ///
    /// On failure the error is returned and the temp file is removed on a
    /// best-effort basis; the target keeps whatever state `rename` left it
    /// in, which on POSIX is the prior content. A directory fsync failure
    /// after a successful rename is also returned: the new content is in
    /// place but may not survive power loss.
    pub fn commit(self) -> Result<(), FsError> {
        if let Err(e) = fs::rename(&self.temp_path, &self.target) {
            remove_best_effort(&self.temp_path);
            return Err(FsError::io(&self.target, e));
        }
        sync_dir(&parent_dir(&self.target))?;
        tracing::debug!(target = %self.target.display(), "atomically replaced file");
        Ok(())
    }
}

/// Durably write `content` to `path`, replacing any existing file
/// atomically. See the module docs for the exact procedure.
pub fn save_file(path: impl AsRef<Path>, content: &[u8]) -> Result<(), FsError> {
    stage_file(path, content)?.commit()
}

/// Perform the first half of [`save_file`]: write `content` to a fresh,
/// owner-only temp file beside `path` and fsync it.
///
/// If writing fails the partially written temp file is removed on a
/// best-effort basis and the target is untouched.
pub fn stage_file(path: impl AsRef<Path>, content: &[u8]) -> Result<StagedFile, FsError> {
    let target = path.as_ref().to_path_buf();
    let temp_path = parent_dir(&target).join(random_temp_name()?);

    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options
        .open(&temp_path)
        .map_err(|e| FsError::io(&temp_path, e))?;

    let written = file.write_all(content).and_then(|()| file.sync_all());
    if let Err(e) = written {
        drop(file);
        remove_best_effort(&temp_path);
        return Err(FsError::io(&temp_path, e));
    }

    Ok(StagedFile { temp_path, target })
}

/// Remove temp files left behind in `dir` by interrupted writes.
///
/// Only regular files whose name is [`TEMP_FILE_PREFIX`] followed by exactly
/// 32 lowercase hex characters are touched. Returns how many were removed.
/// Must not run concurrently with a writer targeting `dir`.
pub fn sweep_orphans(dir: impl AsRef<Path>) -> Result<usize, FsError> {
    let dir = dir.as_ref();
    let mut removed = 0;
    for entry in fs::read_dir(dir).map_err(|e| FsError::io(dir, e))? {
        let entry = entry.map_err(|e| FsError::io(dir, e))?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if !is_temp_name(name) {
            continue;
        }
        let file_type = entry.file_type().map_err(|e| FsError::io(entry.path(), e))?;
        if !file_type.is_file() {
            continue;
        }
        let path = entry.path();
        fs::remove_file(&path).map_err(|e| FsError::io(&path, e))?;
        tracing::warn!(path = %path.display(), "removed orphaned temp file");
        removed += 1;
    }
    Ok(removed)
}

/// Flush a directory's entries to disk.
#[cfg(unix)]
fn sync_dir(dir: &Path) -> Result<(), FsError> {
    fs::File::open(dir)
        .and_then(|d| d.sync_all())
        .map_err(|e| FsError::io(dir, e))
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> Result<(), FsError> {
    Ok(())
}

fn random_temp_name() -> Result<String, FsError> {
    let mut bytes = [0u8; TEMP_NAME_ENTROPY_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| FsError::Entropy(e.to_string()))?;
    let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    Ok(format!("{TEMP_FILE_PREFIX}{hex}"))
}

fn is_temp_name(name: &str) -> bool {
    name.strip_prefix(TEMP_FILE_PREFIX).is_some_and(|rest| {
        rest.len() == TEMP_NAME_ENTROPY_BYTES * 2
            && rest.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    })
}

/// The directory holding `path`; `.` for a bare file name.
fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn remove_best_effort(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        tracing::warn!(path = %path.display(), error = %e, "could not remove temp file");
    }
}
