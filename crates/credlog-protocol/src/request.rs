//! # Session Requests
//!
//! The message a requestor sends to start a session. Each session type has
//! its own shape; all of them share a [`BaseRequest`] (nonce and context)
//! and a list of [`AttributeDisjunction`]s the holder must satisfy.
//!
//! | action       | shape               | disjunctions from  |
//! |--------------|---------------------|--------------------|
//! | `disclosing` | `DisclosureRequest` | `content`          |
//! | `signing`    | `SignatureRequest`  | `content`          |
//! | `issuing`    | `IssuanceRequest`   | `disclose`         |
//!
//! The encoded form of a request does not name its own type. Whoever stores
//! the bytes must also store the [`Action`] that selects the shape to
//! decode them into; see [`SessionRequest::decode`].

use std::collections::BTreeMap;

use credlog_core::{AttributeTypeId, BigNumber, CredentialTypeId, Timestamp};
use serde::{Deserialize, Serialize};

use crate::action::Action;

/// A set of alternative attributes, any one of which satisfies one
/// requested item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDisjunction {
    /// Human-readable description of the requested item.
    pub label: String,
    /// Acceptable attributes, in order of the requestor's preference.
    pub attributes: Vec<AttributeTypeId>,
    /// Required values for some of the acceptable attributes.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub values: BTreeMap<AttributeTypeId, String>,
}

impl AttributeDisjunction {
    /// A disjunction accepting any value of the listed attributes.
    pub fn new(label: impl Into<String>, attributes: Vec<AttributeTypeId>) -> Self {
        Self {
            label: label.into(),
            attributes,
            values: BTreeMap::new(),
        }
    }

    /// Require `attribute` to have exactly `value` to satisfy this item.
    pub fn with_value(mut self, attribute: AttributeTypeId, value: impl Into<String>) -> Self {
        self.values.insert(attribute, value.into());
        self
    }

    /// True if `attribute` is one of the alternatives.
    pub fn contains(&self, attribute: &AttributeTypeId) -> bool {
        self.attributes.contains(attribute)
    }

    /// The value `attribute` must have, if constrained.
    pub fn required_value(&self, attribute: &AttributeTypeId) -> Option<&str> {
        self.values.get(attribute).map(String::as_str)
    }
}

/// Fields shared by every session request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseRequest {
    /// Requestor-chosen context bound into every proof.
    pub context: BigNumber,
    /// Fresh nonce bound into every proof.
    pub nonce: BigNumber,
}

/// A request to disclose attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisclosureRequest {
    /// Nonce and context.
    #[serde(flatten)]
    pub base: BaseRequest,
    /// Requested items.
    pub content: Vec<AttributeDisjunction>,
}

/// A signature made by an external timestamping service over a signed
/// message. Opaque to this crate apart from being carried along.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalTimestamp {
    /// The timestamping service that produced the signature.
    pub server_url: String,
    /// The time attested to.
    pub time: Timestamp,
    /// The service's signature, encoded as the service returned it.
    pub sig: String,
}

/// A request to sign a message with attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureRequest {
    /// Nonce, context and requested items.
    #[serde(flatten)]
    pub disclosure: DisclosureRequest,
    /// The message to sign.
    pub message: String,
    /// Timestamp obtained for the message, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<ExternalTimestamp>,
}

/// One credential to be issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRequest {
    /// The credential type to issue.
    pub credential: CredentialTypeId,
    /// Which of the issuer's public keys signs the credential.
    pub key_counter: u32,
    /// Expiry date; the default validity applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validity: Option<Timestamp>,
    /// Attribute values by attribute name (last identifier segment).
    pub attributes: BTreeMap<String, String>,
}

/// A request to issue credentials, optionally conditioned on disclosure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuanceRequest {
    /// Nonce and context.
    #[serde(flatten)]
    pub base: BaseRequest,
    /// Credentials to issue, in issuance order.
    pub credentials: Vec<CredentialRequest>,
    /// Items the holder must disclose to receive the credentials.
    #[serde(default)]
    pub disclose: Vec<AttributeDisjunction>,
}

/// Any session request, tagged by its session type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionRequest {
    /// A disclosure session.
    Disclosure(DisclosureRequest),
    /// A signature session.
    Signature(SignatureRequest),
    /// An issuance session.
    Issuance(IssuanceRequest),
}

impl SessionRequest {
    /// The session type this request starts.
    pub fn action(&self) -> Action {
        match self {
            Self::Disclosure(_) => Action::Disclosing,
            Self::Signature(_) => Action::Signing,
            Self::Issuance(_) => Action::Issuing,
        }
    }

    /// Nonce and context.
    pub fn base(&self) -> &BaseRequest {
        match self {
            Self::Disclosure(r) => &r.base,
            Self::Signature(r) => &r.disclosure.base,
            Self::Issuance(r) => &r.base,
        }
    }

    /// The attribute disjunctions the holder was asked to disclose.
    pub fn to_disclose(&self) -> &[AttributeDisjunction] {
        match self {
            Self::Disclosure(r) => &r.content,
            Self::Signature(r) => &r.disclosure.content,
            Self::Issuance(r) => &r.disclose,
        }
    }

    /// Encode the request body. The encoding carries no type tag.
    pub fn encode(&self) -> Result<Vec<u8>, serde_json::Error> {
        match self {
            Self::Disclosure(r) => serde_json::to_vec(r),
            Self::Signature(r) => serde_json::to_vec(r),
            Self::Issuance(r) => serde_json::to_vec(r),
        }
    }

    /// Decode a request body into the shape selected by `action`.
    ///
    /// Returns `Ok(None)` for [`Action::Unknown`], which has no request
    /// shape. Malformed bytes are an error, never an empty request.
    pub fn decode(action: Action, bytes: &[u8]) -> Result<Option<Self>, serde_json::Error> {
        let request = match action {
            Action::Disclosing => Self::Disclosure(serde_json::from_slice(bytes)?),
            Action::Signing => Self::Signature(serde_json::from_slice(bytes)?),
            Action::Issuing => Self::Issuance(serde_json::from_slice(bytes)?),
            Action::Unknown => return Ok(None),
        };
        Ok(Some(request))
    }

    /// The signature request, if this is one.
    pub fn as_signature(&self) -> Option<&SignatureRequest> {
        match self {
            Self::Signature(r) => Some(r),
            _ => None,
        }
    }

    /// The issuance request, if this is one.
    pub fn as_issuance(&self) -> Option<&IssuanceRequest> {
        match self {
            Self::Issuance(r) => Some(r),
            _ => None,
        }
    }
}
