//! # Disclosed Attributes
//!
//! Reconstructs, from stored proofs, which attributes a holder revealed in
//! a session and how each relates to what was asked for.
//!
//! Extraction is structural: it resolves every revealed index through the
//! registry and matches the results against the request's disjunctions.
//! It rejects proofs the registry cannot account for (unknown credential
//! type, unknown issuer key, out-of-range index, revealed secret key)
//! rather than dropping them.

use credlog_core::{AttributeTypeId, Timestamp, TranslatedString};
use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;
use crate::proof::{Disclosure, METADATA_INDEX, SECRET_KEY_INDEX};
use crate::registry::DescriptorRegistry;
use crate::request::AttributeDisjunction;

/// How a revealed attribute relates to the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeProofStatus {
    /// Satisfies one of the requested disjunctions.
    Present,
    /// Revealed but not asked for.
    Extra,
    /// Asked for, but with a different required value.
    InvalidValue,
}

/// One revealed attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisclosedAttribute {
    /// The attribute.
    pub identifier: AttributeTypeId,
    /// Display name of the attribute.
    pub name: TranslatedString,
    /// The revealed value.
    pub raw_value: String,
    /// Relation to the request.
    pub status: AttributeProofStatus,
    /// When the credential holding the attribute was issued.
    pub issuance_time: Timestamp,
}

impl Disclosure {
    /// Resolve the revealed attributes of every proof and match them against
    /// `disjunctions`.
    ///
    /// Returns whether every disjunction is satisfied, and the attributes in
    /// proof order then index order.
    pub fn disclosed_attributes(
        &self,
        registry: &dyn DescriptorRegistry,
        disjunctions: &[AttributeDisjunction],
    ) -> Result<(bool, Vec<DisclosedAttribute>), ProtocolError> {
        let mut attributes = Vec::new();

        for proof in &self.proofs {
            let metadata = &proof.metadata;
            let credential = registry
                .credential_type(&metadata.credential_type)
                .ok_or_else(|| ProtocolError::UnknownCredentialType(metadata.credential_type.clone()))?;

            let issuer = credential.issuer();
            if !registry.public_key_exists(&issuer, metadata.key_counter) {
                return Err(ProtocolError::UnknownPublicKey {
                    issuer,
                    counter: metadata.key_counter,
                });
            }

            for (&index, raw_value) in &proof.disclosed {
                match index {
                    SECRET_KEY_INDEX => {
                        return Err(ProtocolError::SecretKeyDisclosed(credential.id.clone()));
                    }
                    // Already decoded into `metadata`.
                    METADATA_INDEX => continue,
                    _ => {}
                }
                let descriptor = credential.attribute_at(index).ok_or_else(|| {
                    ProtocolError::AttributeIndexOutOfRange {
                        credential: credential.id.clone(),
                        index,
                    }
                })?;
                attributes.push(DisclosedAttribute {
                    identifier: credential.id.attribute(&descriptor.id)?,
                    name: descriptor.name.clone(),
                    raw_value: raw_value.clone(),
                    status: AttributeProofStatus::Extra,
                    issuance_time: metadata.signing_date,
                });
            }
        }

        let mut satisfied = true;
        for disjunction in disjunctions {
            let mut found = false;
            for attribute in attributes
                .iter_mut()
                .filter(|a| disjunction.contains(&a.identifier))
            {
                match disjunction.required_value(&attribute.identifier) {
                    Some(required) if required != attribute.raw_value => {
                        if attribute.status == AttributeProofStatus::Extra {
                            attribute.status = AttributeProofStatus::InvalidValue;
                        }
                    }
                    _ => {
                        attribute.status = AttributeProofStatus::Present;
                        found = true;
                        break;
                    }
                }
            }
            satisfied &= found;
        }

        Ok((satisfied, attributes))
    }
}
