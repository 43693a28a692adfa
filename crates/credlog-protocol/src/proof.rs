//! # Proof Messages
//!
//! What a holder sends back at the end of a session:
//!
//! - [`Disclosure`]: one [`ProofD`] per credential from which attributes
//!   are revealed (disclosure and signature sessions).
//! - [`IssueCommitmentMessage`]: a mixed list of [`Proof`]s, with a [`ProofU`]
//!   commitment per credential being issued, plus a `ProofD` for every
//!   credential disclosed as an issuance condition.
//!
//! ## Attribute indices
//!
//! Index 0 of every credential is the holder's secret key and must never be
//! disclosed. Index 1 is the metadata attribute, carried decoded in
//! [`MetadataAttribute`]. Scheme attributes start at index 2, in the order
//! the credential type declares them.

use std::collections::BTreeMap;

use credlog_core::{BigNumber, CredentialTypeId, Timestamp};
use serde::{Deserialize, Serialize};

/// Index of the secret key attribute.
pub const SECRET_KEY_INDEX: u32 = 0;

/// Index of the metadata attribute.
pub const METADATA_INDEX: u32 = 1;

/// Index of the first scheme-defined attribute.
pub const FIRST_ATTRIBUTE_INDEX: u32 = 2;

/// The decoded metadata attribute of a credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataAttribute {
    /// Metadata layout version.
    pub version: u8,
    /// The credential's type.
    pub credential_type: CredentialTypeId,
    /// Which issuer public key signed the credential.
    pub key_counter: u32,
    /// When the credential was issued.
    pub signing_date: Timestamp,
    /// When the credential expires.
    pub expiry: Timestamp,
}

/// A proof of knowledge of a credential, revealing some of its attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofD {
    /// Fiat-Shamir challenge.
    pub c: BigNumber,
    /// Randomized signature value.
    pub a: BigNumber,
    /// Responses for the undisclosed attributes, by index.
    pub responses: BTreeMap<u32, BigNumber>,
    /// The credential's metadata attribute.
    pub metadata: MetadataAttribute,
    /// Revealed raw attribute values, by index.
    pub disclosed: BTreeMap<u32, String>,
}

/// A commitment to the holder's secret key for a credential being issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofU {
    /// The commitment.
    pub u: BigNumber,
    /// Fiat-Shamir challenge.
    pub c: BigNumber,
    /// Response for the secret key.
    pub s_response: BigNumber,
}

/// One element of a heterogeneous proof list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Proof {
    /// A disclosure proof.
    Disclosure(ProofD),
    /// An issuance commitment.
    Commitment(ProofU),
}

/// The holder's response to a disclosure or signature request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disclosure {
    /// One proof per credential disclosed from, in the holder's order.
    pub proofs: Vec<ProofD>,
}

/// The holder's response to an issuance request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueCommitmentMessage {
    /// Commitments and disclosure proofs, interleaved as the holder sent them.
    pub proofs: Vec<Proof>,
    /// The holder's nonce for the issuer's signature proofs.
    pub nonce2: BigNumber,
}

impl IssueCommitmentMessage {
    /// The disclosure proofs embedded in the message, in order.
    pub fn disclosure(&self) -> Disclosure {
        Disclosure {
            proofs: self
                .proofs
                .iter()
                .filter_map(|p| match p {
                    Proof::Disclosure(d) => Some(d.clone()),
                    Proof::Commitment(_) => None,
                })
                .collect(),
        }
    }

    /// The issuance commitments embedded in the message, in order.
    pub fn commitments(&self) -> impl Iterator<Item = &ProofU> {
        self.proofs.iter().filter_map(|p| match p {
            Proof::Commitment(u) => Some(u),
            Proof::Disclosure(_) => None,
        })
    }
}
