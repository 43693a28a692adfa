//! # Signed Messages
//!
//! An attribute-based signature, packaged so a third party can verify it
//! without access to the session that produced it.
//!
//! The proofs of a signature session are bound to a nonce derived from the
//! requestor's nonce, the message, and (when present) the external
//! timestamp signature. [`SignedMessage::signature_nonce`] recomputes that
//! binding: SHA-256 over each component prefixed by its length as a
//! big-endian `u64`, in the order nonce, message, timestamp signature.

use credlog_core::BigNumber;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::disclosed::DisclosedAttribute;
use crate::error::ProtocolError;
use crate::proof::{Disclosure, ProofD};
use crate::registry::DescriptorRegistry;
use crate::request::{AttributeDisjunction, ExternalTimestamp};

/// JSON-LD context tag of the current signed-message format.
pub const SIGNED_MESSAGE_LD_CONTEXT: &str = "https://irma.app/ld/signature/v2";

/// A message signed with disclosed attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedMessage {
    /// Format tag.
    #[serde(rename = "@context")]
    pub ld_context: String,
    /// The disclosure proofs forming the signature.
    pub signature: Vec<ProofD>,
    /// The requestor's nonce.
    pub nonce: BigNumber,
    /// The requestor's context.
    pub context: BigNumber,
    /// The signed message.
    pub message: String,
    /// Timestamp over the signature, if one was obtained.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<ExternalTimestamp>,
}

impl SignedMessage {
    /// The signature proofs as a disclosure.
    pub fn disclosure(&self) -> Disclosure {
        Disclosure {
            proofs: self.signature.clone(),
        }
    }

    /// The nonce the signature proofs are bound to, as lowercase hex.
    pub fn signature_nonce(&self) -> String {
        let mut hasher = Sha256::new();
        absorb(&mut hasher, self.nonce.as_bytes());
        absorb(&mut hasher, self.message.as_bytes());
        if let Some(timestamp) = &self.timestamp {
            absorb(&mut hasher, timestamp.sig.as_bytes());
        }
        hasher
            .finalize()
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect()
    }

    /// The attributes revealed by the signature. No disjunctions are known
    /// outside the session, so every attribute reports as extra.
    pub fn disclosed_attributes(
        &self,
        registry: &dyn DescriptorRegistry,
    ) -> Result<Vec<DisclosedAttribute>, ProtocolError> {
        let none: [AttributeDisjunction; 0] = [];
        let (_, attributes) = self.disclosure().disclosed_attributes(registry, &none)?;
        Ok(attributes)
    }
}

fn absorb(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_be_bytes());
    hasher.update(bytes);
}
