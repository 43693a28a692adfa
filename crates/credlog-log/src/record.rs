//! # Log Records
//!
//! One [`LogRecord`] per completed session or credential removal.
//!
//! ## Invariants
//!
//! Every value of type `LogRecord` satisfies all of these; the fields are
//! private and each constructor checks them:
//!
//! - The kind is never [`LogKind::Unknown`].
//! - The payload variant matches the kind.
//! - Raw request bytes are present iff the kind is not `Removal`.
//! - A protocol version is present only if the kind is not `Removal`.
//!
//! The raw request bytes are authoritative. The decoded request is a cache
//! filled lazily from them by [`LogRecord::session_request`], and is
//! ignored by equality and never persisted.

use std::sync::Arc;

use credlog_core::Timestamp;
use credlog_protocol::{ProtocolVersion, SessionRequest, SIGNED_MESSAGE_LD_CONTEXT};

use crate::cache::RequestCache;
use crate::error::LogError;
use crate::kind::LogKind;
use crate::payload::{LogPayload, RemovedCredentials, SessionResponse};

/// An entry in the session log.
#[derive(Debug, Clone)]
pub struct LogRecord {
    kind: LogKind,
    completed_at: Timestamp,
    protocol_version: Option<ProtocolVersion>,
    raw_request: Option<Vec<u8>>,
    payload: LogPayload,
    request: RequestCache,
}

impl LogRecord {
    /// Record a completed session.
    ///
    /// The request is encoded immediately; the encoding becomes the
    /// record's authoritative copy. Signature sessions additionally copy the
    /// message and timestamp out of the request and stamp the current
    /// signed-message format tag.
    ///
    /// # Errors
    ///
    /// - [`LogError::InvalidKind`] for `Unknown`.
    /// - [`LogError::InvariantViolation`] for `Removal`, or when the
    ///   request or response shape does not fit `kind`.
    /// - [`LogError::Encoding`] if the request cannot be encoded.
    pub fn for_session(
        kind: LogKind,
        completed_at: Timestamp,
        protocol_version: Option<ProtocolVersion>,
        request: &SessionRequest,
        response: SessionResponse,
    ) -> Result<Self, LogError> {
        let action = match kind {
            LogKind::Unknown => return Err(LogError::InvalidKind(kind)),
            LogKind::Removal => {
                return Err(LogError::InvariantViolation(
                    "removal records carry no session; use for_removal".into(),
                ))
            }
            _ => kind.action(),
        };
        if action != Some(request.action()) {
            return Err(LogError::InvariantViolation(format!(
                "{kind} record given a {} request",
                request.action()
            )));
        }

        let raw_request = request.encode().map_err(LogError::Encoding)?;

        let payload = match (kind, response) {
            (LogKind::Signing, SessionResponse::Disclosure(disclosure)) => {
                let signature = request.as_signature().ok_or_else(|| {
                    LogError::InvariantViolation("signing record without signature request".into())
                })?;
                LogPayload::Signing {
                    message: signature.message.clone().into_bytes(),
                    timestamp: signature.timestamp.clone(),
                    ld_context: SIGNED_MESSAGE_LD_CONTEXT.to_string(),
                    disclosure,
                }
            }
            (LogKind::Disclosing, SessionResponse::Disclosure(disclosure)) => {
                LogPayload::Disclosing(disclosure)
            }
            (LogKind::Issuing, SessionResponse::IssueCommitment(commitment)) => {
                LogPayload::Issuing(commitment)
            }
            (kind, response) => {
                return Err(LogError::InvariantViolation(format!(
                    "{kind} record given a {} response",
                    response.shape()
                )))
            }
        };

        Ok(Self {
            kind,
            completed_at,
            protocol_version,
            raw_request: Some(raw_request),
            payload,
            request: RequestCache::default(),
        })
    }

    /// Record the removal of credentials.
    pub fn for_removal(completed_at: Timestamp, removed: RemovedCredentials) -> Self {
        Self {
            kind: LogKind::Removal,
            completed_at,
            protocol_version: None,
            raw_request: None,
            payload: LogPayload::Removal(removed),
            request: RequestCache::default(),
        }
    }

    /// Reassemble a record from stored parts, checking every invariant.
    ///
    /// The raw request is not decoded here; a record whose bytes are
    /// malformed restores fine and fails on first use.
    pub fn from_parts(
        kind: LogKind,
        completed_at: Timestamp,
        protocol_version: Option<ProtocolVersion>,
        raw_request: Option<Vec<u8>>,
        payload: LogPayload,
    ) -> Result<Self, LogError> {
        if kind == LogKind::Unknown {
            return Err(LogError::InvalidKind(kind));
        }
        if payload.kind() != kind {
            return Err(LogError::InvariantViolation(format!(
                "{kind} record with {} payload",
                payload.kind()
            )));
        }
        match (kind, raw_request.is_some()) {
            (LogKind::Removal, true) => {
                return Err(LogError::InvariantViolation(
                    "removal record with a session request".into(),
                ))
            }
            (LogKind::Removal, false) => {}
            (_, false) => {
                return Err(LogError::InvariantViolation(format!(
                    "{kind} record without a session request"
                )))
            }
            (_, true) => {}
        }
        if kind == LogKind::Removal && protocol_version.is_some() {
            return Err(LogError::InvariantViolation(
                "removal record with a protocol version".into(),
            ));
        }

        Ok(Self {
            kind,
            completed_at,
            protocol_version,
            raw_request,
            payload,
            request: RequestCache::default(),
        })
    }

    /// What the record describes.
    pub fn kind(&self) -> LogKind {
        self.kind
    }

    /// When the session completed.
    pub fn completed_at(&self) -> Timestamp {
        self.completed_at
    }

    /// The negotiated protocol version, if recorded.
    pub fn protocol_version(&self) -> Option<&ProtocolVersion> {
        self.protocol_version.as_ref()
    }

    /// The encoded session request. `None` only for removals.
    pub fn raw_request(&self) -> Option<&[u8]> {
        self.raw_request.as_deref()
    }

    /// The kind-specific content.
    pub fn payload(&self) -> &LogPayload {
        &self.payload
    }

    /// The session request, decoded from the raw bytes on first call and
    /// cached after.
    ///
    /// Returns `Ok(None)` for removals. Every successful call on the same
    /// record returns the same `Arc`.
    ///
    /// # Errors
    ///
    /// [`LogError::Decode`] if the bytes do not decode into the shape the
    /// kind selects. Nothing is cached in that case.
    pub fn session_request(&self) -> Result<Option<Arc<SessionRequest>>, LogError> {
        let Some(action) = self.kind.action() else {
            return Ok(None);
        };
        let raw = self.raw_request.as_deref().ok_or_else(|| {
            LogError::InvariantViolation(format!("{} record without a session request", self.kind))
        })?;
        let kind = self.kind;
        self.request
            .get_or_decode(|| {
                SessionRequest::decode(action, raw)
                    .map_err(|source| LogError::Decode { kind, source })?
                    .ok_or(LogError::InvalidKind(kind))
            })
            .map(Some)
    }

    /// True once [`LogRecord::session_request`] has succeeded.
    pub fn is_request_cached(&self) -> bool {
        self.request.is_filled()
    }
}

impl PartialEq for LogRecord {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.completed_at == other.completed_at
            && self.protocol_version == other.protocol_version
            && self.raw_request == other.raw_request
            && self.payload == other.payload
    }
}

impl Eq for LogRecord {}
