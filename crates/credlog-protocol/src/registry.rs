//! # Descriptor Registry
//!
//! Proofs and requests name credentials by identifier and attributes by
//! index. Turning that into names a person can read, and checking that an
//! index or key counter actually exists, requires the scheme descriptions.
//! This crate consults them only through [`DescriptorRegistry`].
//!
//! [`InMemoryRegistry`] is a complete implementation backed by maps. It can
//! be built in code or loaded from a JSON descriptor file:
//!
//! ```json
//! {
//!   "issuers": [
//!     { "id": "irma-demo.RU", "name": {"en": "Radboud"}, "key_counters": [0, 1] }
//!   ],
//!   "credential_types": [
//!     { "id": "irma-demo.RU.studentCard", "name": {"en": "Student card"},
//!       "attributes": [ { "id": "university", "name": {"en": "University"} } ] }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use credlog_core::{CredentialTypeId, IssuerId, TranslatedString};
use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;
use crate::proof::FIRST_ATTRIBUTE_INDEX;

/// Description of one attribute of a credential type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDescriptor {
    /// Attribute name, the last segment of its `AttributeTypeId`.
    pub id: String,
    /// Display name.
    pub name: TranslatedString,
    /// Whether issuance may leave the attribute empty.
    #[serde(default)]
    pub optional: bool,
}

/// Description of a credential type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialTypeDescriptor {
    /// The credential type.
    pub id: CredentialTypeId,
    /// Display name.
    pub name: TranslatedString,
    /// Attributes in index order, starting at index 2.
    pub attributes: Vec<AttributeDescriptor>,
}

impl CredentialTypeDescriptor {
    /// The issuer of this credential type.
    pub fn issuer(&self) -> IssuerId {
        self.id.issuer()
    }

    /// The attribute at proof index `index`, if any.
    pub fn attribute_at(&self, index: u32) -> Option<&AttributeDescriptor> {
        let offset = index.checked_sub(FIRST_ATTRIBUTE_INDEX)?;
        self.attributes.get(usize::try_from(offset).ok()?)
    }

    /// The attribute called `name`, if any.
    pub fn attribute(&self, name: &str) -> Option<&AttributeDescriptor> {
        self.attributes.iter().find(|a| a.id == name)
    }
}

/// Description of an issuer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuerDescriptor {
    /// The issuer.
    pub id: IssuerId,
    /// Display name.
    pub name: TranslatedString,
    /// Counters of the public keys the issuer has published.
    pub key_counters: Vec<u32>,
}

/// Read access to scheme descriptions.
pub trait DescriptorRegistry {
    /// Look up a credential type.
    fn credential_type(&self, id: &CredentialTypeId) -> Option<&CredentialTypeDescriptor>;

    /// Look up an issuer.
    fn issuer(&self, id: &IssuerId) -> Option<&IssuerDescriptor>;

    /// True if `issuer` has published a public key with `counter`.
    fn public_key_exists(&self, issuer: &IssuerId, counter: u32) -> bool {
        self.issuer(issuer)
            .is_some_and(|i| i.key_counters.contains(&counter))
    }
}

/// A [`DescriptorRegistry`] held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRegistry {
    issuers: BTreeMap<IssuerId, IssuerDescriptor>,
    credential_types: BTreeMap<CredentialTypeId, CredentialTypeDescriptor>,
}

#[derive(Deserialize)]
struct RegistryFile {
    #[serde(default)]
    issuers: Vec<IssuerDescriptor>,
    #[serde(default)]
    credential_types: Vec<CredentialTypeDescriptor>,
}

impl InMemoryRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an issuer.
    pub fn add_issuer(&mut self, issuer: IssuerDescriptor) -> Result<(), ProtocolError> {
        if self.issuers.contains_key(&issuer.id) {
            return Err(ProtocolError::DuplicateDescriptor(issuer.id.to_string()));
        }
        self.issuers.insert(issuer.id.clone(), issuer);
        Ok(())
    }

    /// Register a credential type. Its issuer must already be registered.
    pub fn add_credential_type(
        &mut self,
        credential_type: CredentialTypeDescriptor,
    ) -> Result<(), ProtocolError> {
        let issuer = credential_type.issuer();
        if !self.issuers.contains_key(&issuer) {
            return Err(ProtocolError::UnknownIssuer(issuer));
        }
        if self.credential_types.contains_key(&credential_type.id) {
            return Err(ProtocolError::DuplicateDescriptor(
                credential_type.id.to_string(),
            ));
        }
        self.credential_types
            .insert(credential_type.id.clone(), credential_type);
        Ok(())
    }

    /// Build a registry from a JSON descriptor document.
    pub fn from_json(bytes: &[u8]) -> Result<Self, ProtocolError> {
        let file: RegistryFile = serde_json::from_slice(bytes)?;
        let mut registry = Self::new();
        for issuer in file.issuers {
            registry.add_issuer(issuer)?;
        }
        for credential_type in file.credential_types {
            registry.add_credential_type(credential_type)?;
        }
        Ok(registry)
    }

    /// Load a registry from a JSON descriptor file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ProtocolError> {
        let bytes = std::fs::read(path)?;
        Self::from_json(&bytes)
    }

    /// Number of registered credential types.
    pub fn credential_type_count(&self) -> usize {
        self.credential_types.len()
    }
}

impl DescriptorRegistry for InMemoryRegistry {
    fn credential_type(&self, id: &CredentialTypeId) -> Option<&CredentialTypeDescriptor> {
        self.credential_types.get(id)
    }

    fn issuer(&self, id: &IssuerId) -> Option<&IssuerDescriptor> {
        self.issuers.get(id)
    }
}
