//! # Protocol Error Types
//!
//! Structured errors for registry lookups, proof inspection, and message
//! decoding. Registry and proof errors carry the identifiers involved so a
//! caller can tell which credential in a multi-credential session failed.

use credlog_core::{CoreError, CredentialTypeId, IssuerId};
use thiserror::Error;

/// Errors from credential-session message handling.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// The registry has no description of this credential type.
    #[error("unknown credential type {0}")]
    UnknownCredentialType(CredentialTypeId),

    /// The registry has no description of this issuer.
    #[error("unknown issuer {0}")]
    UnknownIssuer(IssuerId),

    /// The issuer has no public key with this counter.
    #[error("issuer {issuer} has no public key with counter {counter}")]
    UnknownPublicKey {
        /// The issuer.
        issuer: IssuerId,
        /// The key counter named by the proof or request.
        counter: u32,
    },

    /// A proof disclosed the holder's secret key attribute.
    #[error("proof for {0} discloses the secret key attribute")]
    SecretKeyDisclosed(CredentialTypeId),

    /// A proof disclosed an attribute index the credential type lacks.
    #[error("attribute index {index} out of range for {credential}")]
    AttributeIndexOutOfRange {
        /// The credential type of the proof.
        credential: CredentialTypeId,
        /// The offending index.
        index: u32,
    },

    /// An issuance request omitted a non-optional attribute.
    #[error("issuance of {credential} is missing attribute {attribute:?}")]
    MissingAttribute {
        /// The credential type being issued.
        credential: CredentialTypeId,
        /// The attribute name.
        attribute: String,
    },

    /// An issuance request set an attribute the credential type lacks.
    #[error("issuance of {credential} sets unknown attribute {attribute:?}")]
    UnexpectedAttribute {
        /// The credential type being issued.
        credential: CredentialTypeId,
        /// The attribute name.
        attribute: String,
    },

    /// The computed expiry date is not representable.
    #[error("validity of {0} overflows the timestamp range")]
    InvalidValidity(CredentialTypeId),

    /// Two registry descriptors share an identifier.
    #[error("duplicate descriptor {0}")]
    DuplicateDescriptor(String),

    /// A protocol version string did not have the form `major.minor`.
    #[error("invalid protocol version {0:?}")]
    InvalidVersion(String),

    /// A legacy session-initiation message had an unexpected shape.
    #[error("malformed legacy session info: {0}")]
    LegacyFormat(String),

    /// A scheme identifier failed validation.
    #[error("identifier error: {0}")]
    Identifier(#[from] CoreError),

    /// JSON encoding or decoding failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Reading a descriptor file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_public_key_display() {
        let err = ProtocolError::UnknownPublicKey {
            issuer: IssuerId::parse("irma-demo.RU").unwrap(),
            counter: 7,
        };
        let msg = format!("{err}");
        assert!(msg.contains("irma-demo.RU"));
        assert!(msg.contains('7'));
    }

    #[test]
    fn index_out_of_range_display() {
        let err = ProtocolError::AttributeIndexOutOfRange {
            credential: CredentialTypeId::parse("irma-demo.RU.studentCard").unwrap(),
            index: 9,
        };
        assert!(format!("{err}").contains("index 9"));
    }

    #[test]
    fn serde_error_converts() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = ProtocolError::from(json_err);
        assert!(matches!(err, ProtocolError::Serialization(_)));
    }
}
