//! # Log Error Types
//!
//! A record either decodes into exactly the shape its kind names or it is
//! reported as broken. Absent views (a removal has no signed message) are
//! `None` or empty, never errors.

use credlog_fs::FsError;
use credlog_protocol::ProtocolError;
use thiserror::Error;

use crate::kind::LogKind;

/// Errors from building, restoring, or reading log records.
#[derive(Error, Debug)]
pub enum LogError {
    /// A record was built for a kind that names no session type.
    #[error("cannot log a session of kind {0}")]
    InvalidKind(LogKind),

    /// A session request or the log file could not be encoded.
    #[error("encoding failed: {0}")]
    Encoding(#[source] serde_json::Error),

    /// The stored request bytes do not decode into the shape the kind selects.
    #[error("stored {kind} request does not decode: {source}")]
    Decode {
        /// The record kind that selected the shape.
        kind: LogKind,
        /// The decoder's complaint.
        #[source]
        source: serde_json::Error,
    },

    /// Kind, request and payload disagree.
    #[error("log record invariant violated: {0}")]
    InvariantViolation(String),

    /// A stored record is readable JSON but not a valid record.
    #[error("malformed log record: {0}")]
    MalformedRecord(String),

    /// The store configuration is unusable.
    #[error("invalid store configuration: {0}")]
    Config(String),

    /// Reconstructing a view failed in the protocol layer.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Reading or writing the log file failed.
    #[error(transparent)]
    Fs(#[from] FsError),
}
