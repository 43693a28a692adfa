//! # Scheme Identifier Newtypes
//!
//! Credential schemes name things hierarchically with dot-separated
//! segments:
//!
//! | type               | segments | example                        |
//! |--------------------|----------|--------------------------------|
//! | `SchemeManagerId`  | 1        | `irma-demo`                    |
//! | `IssuerId`         | 2        | `irma-demo.RU`                 |
//! | `CredentialTypeId` | 3        | `irma-demo.RU.studentCard`     |
//! | `AttributeTypeId`  | 4        | `irma-demo.RU.studentCard.university` |
//!
//! Each level is a distinct type so that, for example, a log keyed by
//! credential type cannot be indexed with an attribute identifier.
//!
//! All four serialize as their plain dotted string.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

fn validate_segments(
    kind: &'static str,
    value: &str,
    expected: usize,
) -> Result<(), CoreError> {
    let reject = |reason: String| CoreError::InvalidIdentifier {
        kind,
        value: value.to_string(),
        reason,
    };
    let segments: Vec<&str> = value.split('.').collect();
    if segments.len() != expected {
        return Err(reject(format!(
            "expected {expected} dot-separated segments, got {}",
            segments.len()
        )));
    }
    for segment in segments {
        if segment.is_empty() {
            return Err(reject("empty segment".into()));
        }
        if let Some(c) = segment
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(reject(format!("invalid character {c:?}")));
        }
    }
    Ok(())
}

/// Everything before the last segment.
fn parent(value: &str) -> &str {
    value.rsplit_once('.').map(|(p, _)| p).unwrap_or("")
}

macro_rules! scheme_identifier {
    ($(#[$meta:meta])* $name:ident, $kind:literal, $segments:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Parse and validate an identifier.
            pub fn parse(value: &str) -> Result<Self, CoreError> {
                validate_segments($kind, value, $segments)?;
                Ok(Self(value.to_string()))
            }

            /// The full dotted identifier.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// The last segment of the identifier.
            pub fn name(&self) -> &str {
                self.0.rsplit('.').next().unwrap_or(&self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = CoreError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                validate_segments($kind, &value, $segments)?;
                Ok(Self(value))
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> String {
                id.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

scheme_identifier!(
    /// Identifier of a scheme manager, the root of a credential scheme.
    SchemeManagerId,
    "scheme manager",
    1
);

scheme_identifier!(
    /// Identifier of an issuer within a scheme.
    IssuerId,
    "issuer",
    2
);

scheme_identifier!(
    /// Identifier of a credential type issued by an issuer.
    CredentialTypeId,
    "credential type",
    3
);

scheme_identifier!(
    /// Identifier of a single attribute within a credential type.
    AttributeTypeId,
    "attribute type",
    4
);

impl IssuerId {
    /// The scheme manager this issuer belongs to.
    pub fn scheme_manager(&self) -> SchemeManagerId {
        SchemeManagerId(parent(&self.0).to_string())
    }
}

impl CredentialTypeId {
    /// The issuer of this credential type.
    pub fn issuer(&self) -> IssuerId {
        IssuerId(parent(&self.0).to_string())
    }

    /// Build the identifier of an attribute of this credential type.
    pub fn attribute(&self, name: &str) -> Result<AttributeTypeId, CoreError> {
        AttributeTypeId::parse(&format!("{}.{name}", self.0))
    }
}

impl AttributeTypeId {
    /// The credential type this attribute belongs to.
    pub fn credential_type(&self) -> CredentialTypeId {
        CredentialTypeId(parent(&self.0).to_string())
    }
}
