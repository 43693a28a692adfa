//! # Session-Info Subcommand
//!
//! Decodes a captured first session message, including the list-of-pairs
//! key map older peers send, and prints it in plain JSON.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::{json, Value};

use credlog_protocol::SessionInfo;

/// Arguments for the `credlog session-info` subcommand.
#[derive(Args, Debug)]
pub struct SessionInfoArgs {
    /// File holding the session-info JSON message.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

/// Execute the session-info subcommand.
pub fn run_session_info(args: &SessionInfoArgs) -> Result<u8> {
    let bytes = std::fs::read(&args.file)
        .with_context(|| format!("failed to read file: {}", args.file.display()))?;
    let info = SessionInfo::from_json(&bytes)
        .with_context(|| format!("failed to decode session info: {}", args.file.display()))?;
    println!("{}", serde_json::to_string_pretty(&describe(&info))?);
    Ok(0)
}

/// The session info with its key map as an ordinary JSON object.
pub fn describe(info: &SessionInfo) -> Value {
    let keys: serde_json::Map<String, Value> = info
        .keys
        .iter()
        .map(|(issuer, counter)| (issuer.to_string(), json!(counter)))
        .collect();
    json!({
        "jwt": info.jwt,
        "nonce": info.nonce.as_str(),
        "context": info.context.as_str(),
        "keys": keys,
    })
}
