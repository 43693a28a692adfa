//! Record kinds.

use credlog_protocol::Action;
use serde::{Deserialize, Serialize};

/// What a log record describes.
///
/// The three session kinds mirror [`Action`]; `Removal` records a holder
/// deleting credentials and never has a session request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    /// Attributes were disclosed.
    Disclosing,
    /// A message was signed with attributes.
    Signing,
    /// Credentials were issued.
    Issuing,
    /// Credentials were removed by the holder.
    Removal,
    /// Unrecognized kind. Never valid in a stored record.
    Unknown,
}

impl LogKind {
    /// The session type whose request this kind's records carry.
    pub fn action(self) -> Option<Action> {
        match self {
            Self::Disclosing => Some(Action::Disclosing),
            Self::Signing => Some(Action::Signing),
            Self::Issuing => Some(Action::Issuing),
            Self::Removal | Self::Unknown => None,
        }
    }

    /// The wire tag.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disclosing => "disclosing",
            Self::Signing => "signing",
            Self::Issuing => "issuing",
            Self::Removal => "removal",
            Self::Unknown => "unknown",
        }
    }
}

impl From<Action> for LogKind {
    fn from(action: Action) -> Self {
        match action {
            Action::Disclosing => Self::Disclosing,
            Action::Signing => Self::Signing,
            Action::Issuing => Self::Issuing,
            Action::Unknown => Self::Unknown,
        }
    }
}

impl std::fmt::Display for LogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}
