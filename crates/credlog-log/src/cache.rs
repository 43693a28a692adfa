//! # Request Cache
//!
//! Decoding a stored request is cheap but not free, and views are read far
//! more often than records are written. The decoded request is therefore
//! kept in a write-once slot next to the raw bytes.
//!
//! ## Invariants
//!
//! - Filled at most once per record. Concurrent first readers may each
//!   decode, but only one result is stored and every caller gets that one.
//! - Never filled with a failed decode.
//! - Only ever derived from the raw bytes; nothing writes it directly.

use std::sync::{Arc, OnceLock};

use credlog_protocol::SessionRequest;

use crate::error::LogError;

/// Write-once slot holding a decoded session request.
#[derive(Debug, Clone, Default)]
pub(crate) struct RequestCache(OnceLock<Arc<SessionRequest>>);

impl RequestCache {
    /// The cached request, decoding it with `decode` on first use.
    pub(crate) fn get_or_decode<F>(&self, decode: F) -> Result<Arc<SessionRequest>, LogError>
    where
        F: FnOnce() -> Result<SessionRequest, LogError>,
    {
        if let Some(request) = self.0.get() {
            return Ok(Arc::clone(request));
        }
        let decoded = Arc::new(decode()?);
        let stored = self.0.get_or_init(|| {
            tracing::debug!(action = %decoded.action(), "cached decoded session request");
            Arc::clone(&decoded)
        });
        Ok(Arc::clone(stored))
    }

    pub(crate) fn is_filled(&self) -> bool {
        self.0.get().is_some()
    }
}
