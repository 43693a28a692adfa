//! # credlog-cli
//!
//! Command-line inspector for a holder's credential session log.
//!
//! ## Subcommands
//!
//! - `logs list`: stored records, newest first
//! - `logs show`: disclosed attributes, issued credentials and signed
//!   message reconstructed from one record
//! - `session-info`: decode a first session message, legacy key map included
//!
//! ## Crate Policy
//!
//! - Argument parsing lives here; every record operation is delegated to
//!   `credlog-log` and `credlog-protocol`.
//! - The store is opened with `LogStore::open_read_only` and never written,
//!   so inspecting a log never disturbs a wallet writing to it.

pub mod logs;
pub mod session_info;
