//! # Record Payloads
//!
//! The kind-specific part of a log record. Each variant corresponds to
//! exactly one [`LogKind`]; a record whose payload variant disagrees with its
//! kind cannot be constructed.

use std::collections::BTreeMap;

use credlog_core::{CredentialTypeId, TranslatedString};
use credlog_protocol::{Disclosure, ExternalTimestamp, IssueCommitmentMessage};

use crate::kind::LogKind;

/// Credentials removed by the holder, with the display names of the
/// attribute values they held.
pub type RemovedCredentials = BTreeMap<CredentialTypeId, Vec<TranslatedString>>;

/// Kind-specific content of a log record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogPayload {
    /// Credentials deleted from the holder's wallet.
    Removal(RemovedCredentials),
    /// A signature session.
    Signing {
        /// The signed message, as sent.
        message: Vec<u8>,
        /// External timestamp over the signature, if any.
        timestamp: Option<ExternalTimestamp>,
        /// Signed-message format tag at the time of signing.
        ld_context: String,
        /// The signature proofs.
        disclosure: Disclosure,
    },
    /// A disclosure session.
    Disclosing(Disclosure),
    /// An issuance session.
    Issuing(IssueCommitmentMessage),
}

impl LogPayload {
    /// The record kind this payload belongs to.
    pub fn kind(&self) -> LogKind {
        match self {
            Self::Removal(_) => LogKind::Removal,
            Self::Signing { .. } => LogKind::Signing,
            Self::Disclosing(_) => LogKind::Disclosing,
            Self::Issuing(_) => LogKind::Issuing,
        }
    }
}

/// What the holder sent back to complete a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionResponse {
    /// Disclosure proofs, for disclosure and signature sessions.
    Disclosure(Disclosure),
    /// Commitments, for issuance sessions.
    IssueCommitment(IssueCommitmentMessage),
}

impl SessionResponse {
    pub(crate) fn shape(&self) -> &'static str {
        match self {
            Self::Disclosure(_) => "disclosure",
            Self::IssueCommitment(_) => "issue-commitment",
        }
    }
}
