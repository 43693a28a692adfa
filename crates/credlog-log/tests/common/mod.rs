//! Shared fixtures: a small scheme and builders for requests and proofs.

#![allow(dead_code)]

use std::collections::BTreeMap;

use credlog_core::{AttributeTypeId, BigNumber, CredentialTypeId, Timestamp};
use credlog_protocol::{
    AttributeDisjunction, BaseRequest, CredentialRequest, Disclosure, DisclosureRequest,
    InMemoryRegistry, IssuanceRequest, IssueCommitmentMessage, MetadataAttribute, Proof, ProofD,
    ProofU, SessionRequest, SignatureRequest,
};

pub const SCHEME: &str = r#"{
    "issuers": [
        {"id": "irma-demo.MijnOverheid", "name": {"en": "MijnOverheid", "nl": "MijnOverheid"}, "key_counters": [1]},
        {"id": "irma-demo.RU", "name": {"en": "Radboud University", "nl": "Radboud Universiteit"}, "key_counters": [0, 2]}
    ],
    "credential_types": [
        {"id": "irma-demo.MijnOverheid.ageLimits", "name": {"en": "Age limits"},
         "attributes": [
            {"id": "over12", "name": {"en": "Over 12"}},
            {"id": "over16", "name": {"en": "Over 16"}},
            {"id": "over18", "name": {"en": "Over 18"}},
            {"id": "over21", "name": {"en": "Over 21"}}
         ]},
        {"id": "irma-demo.MijnOverheid.root", "name": {"en": "Root"},
         "attributes": [{"id": "BSN", "name": {"en": "BSN"}}]},
        {"id": "irma-demo.RU.studentCard", "name": {"en": "Student card"},
         "attributes": [
            {"id": "university", "name": {"en": "University"}},
            {"id": "studentCardNumber", "name": {"en": "Student number"}},
            {"id": "studentID", "name": {"en": "Student ID"}},
            {"id": "level", "name": {"en": "Level"}, "optional": true}
         ]}
    ]
}"#;

pub fn registry() -> InMemoryRegistry {
    InMemoryRegistry::from_json(SCHEME.as_bytes()).unwrap()
}

pub fn at(s: &str) -> Timestamp {
    Timestamp::parse(s).unwrap()
}

pub fn cred(s: &str) -> CredentialTypeId {
    CredentialTypeId::parse(s).unwrap()
}

pub fn attr(s: &str) -> AttributeTypeId {
    AttributeTypeId::parse(s).unwrap()
}

pub fn base(nonce: u64) -> BaseRequest {
    BaseRequest {
        context: BigNumber::from(1),
        nonce: BigNumber::from(nonce),
    }
}

pub fn over18_disjunction() -> AttributeDisjunction {
    AttributeDisjunction::new(
        "Over 18",
        vec![
            attr("irma-demo.MijnOverheid.ageLimits.over18"),
            attr("irma-demo.MijnOverheid.ageLimits.over21"),
        ],
    )
}

pub fn disclosure_request(content: Vec<AttributeDisjunction>) -> SessionRequest {
    SessionRequest::Disclosure(DisclosureRequest {
        base: base(1234),
        content,
    })
}

pub fn signature_request(message: &str, content: Vec<AttributeDisjunction>) -> SessionRequest {
    SessionRequest::Signature(SignatureRequest {
        disclosure: DisclosureRequest {
            base: base(5678),
            content,
        },
        message: message.to_string(),
        timestamp: None,
    })
}

pub fn student_card(number: &str) -> CredentialRequest {
    CredentialRequest {
        credential: cred("irma-demo.RU.studentCard"),
        key_counter: 2,
        validity: None,
        attributes: BTreeMap::from([
            ("university".to_string(), "Radboud".to_string()),
            ("studentCardNumber".to_string(), number.to_string()),
            ("studentID".to_string(), format!("s{number}")),
        ]),
    }
}

pub fn issuance_request(
    credentials: Vec<CredentialRequest>,
    disclose: Vec<AttributeDisjunction>,
) -> SessionRequest {
    SessionRequest::Issuance(IssuanceRequest {
        base: base(9012),
        credentials,
        disclose,
    })
}

/// A disclosure proof over `credential` revealing `(index, value)` pairs.
pub fn proof_d(credential: &str, key_counter: u32, disclosed: &[(u32, &str)]) -> ProofD {
    ProofD {
        c: BigNumber::from(101),
        a: BigNumber::from(102),
        responses: BTreeMap::from([(0, BigNumber::from(103))]),
        metadata: MetadataAttribute {
            version: 3,
            credential_type: cred(credential),
            key_counter,
            signing_date: at("2026-01-10T00:00:00Z"),
            expiry: at("2026-07-10T00:00:00Z"),
        },
        disclosed: disclosed
            .iter()
            .map(|(i, v)| (*i, v.to_string()))
            .collect(),
    }
}

/// Age-limits proof revealing over18 (index 4) as `value`.
pub fn over18_proof(value: &str) -> ProofD {
    proof_d("irma-demo.MijnOverheid.ageLimits", 1, &[(1, "meta"), (4, value)])
}

pub fn disclosure(proofs: Vec<ProofD>) -> Disclosure {
    Disclosure { proofs }
}

pub fn proof_u(seed: u64) -> ProofU {
    ProofU {
        u: BigNumber::from(seed),
        c: BigNumber::from(seed + 1),
        s_response: BigNumber::from(seed + 2),
    }
}

pub fn commitment(proofs: Vec<Proof>) -> IssueCommitmentMessage {
    IssueCommitmentMessage {
        proofs,
        nonce2: BigNumber::from(4242),
    }
}
