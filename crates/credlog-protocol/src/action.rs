//! # Session Actions and Statuses
//!
//! The session type announced in a session pointer, and the statuses a
//! session passes through while the holder is connected.

use serde::{Deserialize, Serialize};

/// The type of a credential session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// The holder discloses attributes to a verifier.
    Disclosing,
    /// The holder signs a message with attributes.
    Signing,
    /// The holder receives new credentials.
    Issuing,
    /// The session type could not be determined.
    Unknown,
}

impl Action {
    /// The wire tag of this action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disclosing => "disclosing",
            Self::Signing => "signing",
            Self::Issuing => "issuing",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Progress of a session as reported to the requestor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// The holder fetched the session request.
    Connected,
    /// The holder is exchanging protocol messages.
    Communicating,
}
