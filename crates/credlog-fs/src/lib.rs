//! # credlog-fs: Crash-Safe Persistence Primitives
//!
//! The storage layer of a credential log only ever needs one write
//! operation: replace a whole file with new content such that an observer,
//! including one arriving after a crash, sees either the old bytes or the
//! new bytes and never a mixture.
//!
//! - **Atomic write** (`atomic.rs`): stage into a randomly named sibling
//!   file, fsync, then `rename` over the target.
//! - **Path checks** (`path.rs`): existence checks that keep "absent" and
//!   "could not tell" apart, and owner-only directory creation.
//!
//! ## Concurrency
//!
//! Single writer per target path. Concurrent writers each succeed and the
//! last rename wins; nothing here locks.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `credlog-*` crates.
//! - Synchronous, blocking I/O only.
//! - Nothing retries internally; retry policy belongs to the caller.

pub mod atomic;
pub mod error;
pub mod path;

pub use atomic::{save_file, stage_file, sweep_orphans, StagedFile, TEMP_FILE_PREFIX};
pub use error::FsError;
pub use path::{assert_path_exists, ensure_directory_exists, path_exists};
