//! # Logs Subcommand
//!
//! Read-only inspection of a stored session log. Records are numbered in
//! newest-first order, the same order `list` prints them in, so an index
//! from `list` can be passed straight to `show`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde::Serialize;

use credlog_log::{LogPayload, LogRecord, LogStore, StoreConfig};
use credlog_protocol::{CredentialInfo, DisclosedAttribute, InMemoryRegistry, SignedMessage};

/// Arguments for the `credlog logs` subcommand.
#[derive(Args, Debug)]
pub struct LogsArgs {
    #[command(subcommand)]
    pub command: LogsCommand,
}

/// Logs subcommands.
#[derive(Subcommand, Debug)]
pub enum LogsCommand {
    /// List records, newest first.
    List {
        /// Maximum number of records to print.
        #[arg(long, default_value_t = 20)]
        max: usize,
    },

    /// Print the derived views of one record as JSON.
    Show {
        /// Position of the record in `list` output.
        #[arg(value_name = "INDEX")]
        index: usize,
        /// JSON scheme descriptor file used to name attributes.
        #[arg(long, value_name = "FILE")]
        registry: PathBuf,
    },
}

/// Execute the logs subcommand.
pub fn run_logs(args: &LogsArgs, config: &StoreConfig) -> Result<u8> {
    let store = LogStore::open_read_only(config.clone())
        .with_context(|| format!("failed to open log store at {}", config.storage_dir.display()))?;

    match &args.command {
        LogsCommand::List { max } => {
            let records = store.load_newest(*max).context("failed to load logs")?;
            if records.is_empty() {
                println!("no log records in {}", store.path().display());
            }
            for (index, record) in records.iter().enumerate() {
                println!("{}", list_line(index, record));
            }
            Ok(0)
        }
        LogsCommand::Show { index, registry } => {
            let registry = InMemoryRegistry::from_file(registry)
                .with_context(|| format!("failed to load registry {}", registry.display()))?;
            let records = store.load_newest(usize::MAX).context("failed to load logs")?;
            let Some(record) = records.get(*index) else {
                println!("NOT FOUND: no record at index {index} ({} records)", records.len());
                return Ok(1);
            };
            let view = RecordView::build(record, &registry)?;
            println!("{}", serde_json::to_string_pretty(&view)?);
            Ok(0)
        }
    }
}

/// One line of `list` output: index, completion time, kind, summary.
pub fn list_line(index: usize, record: &LogRecord) -> String {
    let version = record
        .protocol_version()
        .map(|v| format!(" v{v}"))
        .unwrap_or_default();
    format!(
        "{index:>4}  {}  {:<10}{}  {}",
        record.completed_at(),
        record.kind(),
        version,
        summary(record.payload())
    )
}

fn summary(payload: &LogPayload) -> String {
    match payload {
        LogPayload::Removal(removed) => {
            let names: Vec<&str> = removed.keys().map(|id| id.as_str()).collect();
            format!("removed {}", names.join(", "))
        }
        LogPayload::Disclosing(disclosure) => {
            format!("disclosed from {} credential(s)", disclosure.proofs.len())
        }
        LogPayload::Signing {
            message,
            disclosure,
            ..
        } => format!(
            "signed {:?} with {} credential(s)",
            String::from_utf8_lossy(message),
            disclosure.proofs.len()
        ),
        LogPayload::Issuing(commitment) => {
            format!("{} credential(s) issued", commitment.commitments().count())
        }
    }
}

/// Everything a holder can learn from one record.
#[derive(Debug, Serialize)]
pub struct RecordView {
    pub kind: String,
    pub completed_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol_version: Option<String>,
    pub disclosed: Vec<DisclosedAttribute>,
    pub issued: Vec<CredentialInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signed_message: Option<SignedMessage>,
}

impl RecordView {
    /// Compute every view of `record`.
    pub fn build(record: &LogRecord, registry: &InMemoryRegistry) -> Result<Self> {
        Ok(Self {
            kind: record.kind().to_string(),
            completed_at: record.completed_at().to_iso8601(),
            protocol_version: record.protocol_version().map(ToString::to_string),
            disclosed: record
                .disclosed_attributes(registry)
                .context("failed to reconstruct disclosed attributes")?,
            issued: record
                .issued_credentials(registry)
                .context("failed to reconstruct issued credentials")?,
            signed_message: record
                .signed_message()
                .context("failed to reconstruct signed message")?,
        })
    }
}
