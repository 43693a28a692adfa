//! # Issued Credential Descriptions
//!
//! What an issuance session handed the holder, recomputed from the
//! issuance request and the scheme descriptions.

use credlog_core::{AttributeTypeId, CredentialTypeId, IssuerId, Timestamp, TranslatedString};
use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;
use crate::registry::DescriptorRegistry;
use crate::request::{CredentialRequest, IssuanceRequest};
use crate::version::ProtocolVersion;

/// Validity of an issued credential when the request sets no expiry.
pub const DEFAULT_VALIDITY_MONTHS: u32 = 6;

/// One attribute of an issued credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedAttribute {
    /// The attribute.
    pub identifier: AttributeTypeId,
    /// Display name.
    pub name: TranslatedString,
    /// The issued value; `None` for an optional attribute left empty.
    pub value: Option<String>,
}

/// A credential as issued in a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialInfo {
    /// The credential type.
    pub credential_type: CredentialTypeId,
    /// The issuer.
    pub issuer: IssuerId,
    /// Display name of the credential type.
    pub name: TranslatedString,
    /// Display name of the issuer.
    pub issuer_name: TranslatedString,
    /// When the credential was issued.
    pub signed_on: Timestamp,
    /// When the credential expires.
    pub expires: Timestamp,
    /// Attributes in the credential type's declared order.
    pub attributes: Vec<IssuedAttribute>,
    /// Metadata attribute layout the credential was issued with.
    pub metadata_version: u8,
}

impl IssuanceRequest {
    /// Describe every credential this request issued, in request order.
    ///
    /// `version` is the session's negotiated protocol version and selects
    /// the metadata layout; `issued_at` is the session completion time,
    /// used as signing date and as the base of the default validity.
    pub fn credential_info_list(
        &self,
        registry: &dyn DescriptorRegistry,
        version: Option<&ProtocolVersion>,
        issued_at: Timestamp,
    ) -> Result<Vec<CredentialInfo>, ProtocolError> {
        let metadata_version = ProtocolVersion::metadata_version(version);
        self.credentials
            .iter()
            .map(|request| credential_info(registry, request, metadata_version, issued_at))
            .collect()
    }
}

fn credential_info(
    registry: &dyn DescriptorRegistry,
    request: &CredentialRequest,
    metadata_version: u8,
    issued_at: Timestamp,
) -> Result<CredentialInfo, ProtocolError> {
    let credential = registry
        .credential_type(&request.credential)
        .ok_or_else(|| ProtocolError::UnknownCredentialType(request.credential.clone()))?;
    let issuer_id = credential.issuer();
    let issuer = registry
        .issuer(&issuer_id)
        .ok_or_else(|| ProtocolError::UnknownIssuer(issuer_id.clone()))?;
    if !registry.public_key_exists(&issuer_id, request.key_counter) {
        return Err(ProtocolError::UnknownPublicKey {
            issuer: issuer_id,
            counter: request.key_counter,
        });
    }

    if let Some(unknown) = request
        .attributes
        .keys()
        .find(|name| credential.attribute(name).is_none())
    {
        return Err(ProtocolError::UnexpectedAttribute {
            credential: credential.id.clone(),
            attribute: unknown.clone(),
        });
    }

    let mut attributes = Vec::with_capacity(credential.attributes.len());
    for descriptor in &credential.attributes {
        let value = request.attributes.get(&descriptor.id).cloned();
        if value.is_none() && !descriptor.optional {
            return Err(ProtocolError::MissingAttribute {
                credential: credential.id.clone(),
                attribute: descriptor.id.clone(),
            });
        }
        attributes.push(IssuedAttribute {
            identifier: credential.id.attribute(&descriptor.id)?,
            name: descriptor.name.clone(),
            value,
        });
    }

    let expires = match request.validity {
        Some(validity) => validity,
        None => issued_at
            .checked_add_months(DEFAULT_VALIDITY_MONTHS)
            .ok_or_else(|| ProtocolError::InvalidValidity(credential.id.clone()))?,
    };

    Ok(CredentialInfo {
        credential_type: credential.id.clone(),
        issuer: issuer.id.clone(),
        name: credential.name.clone(),
        issuer_name: issuer.name.clone(),
        signed_on: issued_at,
        expires,
        attributes,
        metadata_version,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use credlog_core::BigNumber;

    use super::*;
    use crate::registry::InMemoryRegistry;
    use crate::request::BaseRequest;
    use crate::version::{LEGACY_METADATA_VERSION, METADATA_VERSION};

    fn registry() -> InMemoryRegistry {
        InMemoryRegistry::from_json(
            br#"{
            "issuers": [{"id": "irma-demo.RU", "name": {"en": "Radboud"}, "key_counters": [0]}],
            "credential_types": [
                {"id": "irma-demo.RU.studentCard", "name": {"en": "Student card"},
                 "attributes": [
                    {"id": "university", "name": {"en": "University"}},
                    {"id": "studentID", "name": {"en": "Student number"}},
                    {"id": "level", "name": {"en": "Level"}, "optional": true}
                 ]}
            ]
        }"#,
        )
        .unwrap()
    }

    fn request(attrs: &[(&str, &str)], validity: Option<Timestamp>) -> IssuanceRequest {
        IssuanceRequest {
            base: BaseRequest {
                context: BigNumber::from(1),
                nonce: BigNumber::from(2),
            },
            credentials: vec![CredentialRequest {
                credential: CredentialTypeId::parse("irma-demo.RU.studentCard").unwrap(),
                key_counter: 0,
                validity,
                attributes: attrs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect::<BTreeMap<_, _>>(),
            }],
            disclose: vec![],
        }
    }

    fn issued_at() -> Timestamp {
        Timestamp::parse("2026-02-10T09:00:00Z").unwrap()
    }

    #[test]
    fn describes_credential_in_declared_order() {
        let req = request(&[("studentID", "s123"), ("university", "Radboud")], None);
        let list = req
            .credential_info_list(&registry(), Some(&ProtocolVersion::new(2, 5)), issued_at())
            .unwrap();
        assert_eq!(list.len(), 1);
        let info = &list[0];
        assert_eq!(info.issuer.as_str(), "irma-demo.RU");
        assert_eq!(info.issuer_name.get("en"), Some("Radboud"));
        let names: Vec<_> = info.attributes.iter().map(|a| a.identifier.name()).collect();
        assert_eq!(names, ["university", "studentID", "level"]);
        assert_eq!(info.attributes[0].value.as_deref(), Some("Radboud"));
        assert_eq!(info.attributes[2].value, None);
        assert_eq!(info.metadata_version, METADATA_VERSION);
    }

    #[test]
    fn default_validity_is_six_months() {
        let req = request(&[("studentID", "s1"), ("university", "RU")], None);
        let info = &req.credential_info_list(&registry(), None, issued_at()).unwrap()[0];
        assert_eq!(info.signed_on, issued_at());
        assert_eq!(info.expires.to_iso8601(), "2026-08-10T09:00:00Z");
    }

    #[test]
    fn explicit_validity_wins() {
        let until = Timestamp::parse("2030-01-01T00:00:00Z").unwrap();
        let req = request(&[("studentID", "s1"), ("university", "RU")], Some(until));
        let info = &req.credential_info_list(&registry(), None, issued_at()).unwrap()[0];
        assert_eq!(info.expires, until);
    }

    #[test]
    fn old_protocol_uses_legacy_metadata() {
        let req = request(&[("studentID", "s1"), ("university", "RU")], None);
        let info = &req
            .credential_info_list(&registry(), Some(&ProtocolVersion::new(2, 2)), issued_at())
            .unwrap()[0];
        assert_eq!(info.metadata_version, LEGACY_METADATA_VERSION);
    }

    #[test]
    fn missing_required_attribute() {
        let req = request(&[("university", "RU")], None);
        let err = req.credential_info_list(&registry(), None, issued_at()).unwrap_err();
        assert!(matches!(err, ProtocolError::MissingAttribute { ref attribute, .. } if attribute == "studentID"));
    }

    #[test]
    fn unexpected_attribute() {
        let req = request(&[("studentID", "s1"), ("university", "RU"), ("gpa", "9")], None);
        let err = req.credential_info_list(&registry(), None, issued_at()).unwrap_err();
        assert!(matches!(err, ProtocolError::UnexpectedAttribute { ref attribute, .. } if attribute == "gpa"));
    }

    #[test]
    fn unknown_key_counter() {
        let mut req = request(&[("studentID", "s1"), ("university", "RU")], None);
        req.credentials[0].key_counter = 3;
        let err = req.credential_info_list(&registry(), None, issued_at()).unwrap_err();
        assert!(matches!(err, ProtocolError::UnknownPublicKey { counter: 3, .. }));
    }
}
