//! # credlog-log: Session Audit Log
//!
//! A durable record of every completed credential session, from which the
//! holder can later recompute what was disclosed, issued, or signed without
//! re-running any cryptography.
//!
//! - **Records** (`record.rs`): [`LogRecord`], a closed union over
//!   [`LogKind`] whose constructors enforce the kind/payload/request
//!   invariants.
//! - **Request cache** (`cache.rs`): the decoded session request, filled
//!   once from the stored bytes and shared through an `Arc`.
//! - **Views** (`views.rs`): disclosed attributes, issued credentials, and
//!   the signed message of a record.
//! - **Storage** (`stored.rs`, `store.rs`, `config.rs`): the on-disk record
//!   format and a [`LogStore`] persisting records through the atomic writer.
//!
//! ## Security Invariant
//!
//! The stored request bytes are the only source of truth about what was
//! requested. The decoded form is never persisted and never written
//! except by decoding those bytes.

mod cache;
pub mod config;
pub mod error;
pub mod kind;
pub mod payload;
pub mod record;
pub mod store;
mod stored;
mod views;

pub use config::{StoreConfig, LOG_FILE_ENV, STORAGE_DIR_ENV};
pub use error::LogError;
pub use kind::LogKind;
pub use payload::{LogPayload, RemovedCredentials, SessionResponse};
pub use record::LogRecord;
pub use store::LogStore;
