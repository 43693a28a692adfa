//! # Stored Record Format
//!
//! How a [`LogRecord`] looks inside the log file. The layout is flat, with
//! one optional field per kind-specific payload part:
//!
//! ```json
//! {
//!   "type": "signing",
//!   "time": "2026-06-15T14:00:00Z",
//!   "version": "2.5",
//!   "request": { "nonce": "...", "context": "...", "content": [], "message": "..." },
//!   "signed_message": "49206167726565",
//!   "signed_message_ld_context": "https://irma.app/ld/signature/v2",
//!   "disclosure": { "proofs": [] }
//! }
//! ```
//!
//! `request` is embedded verbatim: the stored bytes are exactly the bytes the
//! record was built with, so what is read back is what was written. The
//! signed message is hex because it is raw bytes, not necessarily text.
//!
//! Restoring goes through [`LogRecord::from_parts`], so a file cannot smuggle
//! in a record that breaks the record invariants.

use credlog_core::Timestamp;
use credlog_protocol::{Disclosure, ExternalTimestamp, IssueCommitmentMessage, ProtocolVersion};
use serde::{de, ser, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::value::RawValue;

use crate::error::LogError;
use crate::kind::LogKind;
use crate::payload::{LogPayload, RemovedCredentials};
use crate::record::LogRecord;

#[derive(Serialize, Deserialize)]
struct StoredRecord {
    #[serde(rename = "type")]
    kind: LogKind,
    time: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<ProtocolVersion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    request: Option<Box<RawValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    removed: Option<RemovedCredentials>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    signed_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timestamp: Option<ExternalTimestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    signed_message_ld_context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    issue_commitment: Option<IssueCommitmentMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    disclosure: Option<Disclosure>,
}

impl StoredRecord {
    fn from_record(record: &LogRecord) -> Result<Self, LogError> {
        let request = record
            .raw_request()
            .map(|raw| {
                let text = std::str::from_utf8(raw).map_err(|e| {
                    LogError::MalformedRecord(format!("session request is not UTF-8: {e}"))
                })?;
                RawValue::from_string(text.to_owned()).map_err(|e| {
                    LogError::MalformedRecord(format!("session request is not JSON: {e}"))
                })
            })
            .transpose()?;

        let mut stored = Self {
            kind: record.kind(),
            time: record.completed_at(),
            version: record.protocol_version().copied(),
            request,
            removed: None,
            signed_message: None,
            timestamp: None,
            signed_message_ld_context: None,
            issue_commitment: None,
            disclosure: None,
        };
        match record.payload().clone() {
            LogPayload::Removal(removed) => stored.removed = Some(removed),
            LogPayload::Signing {
                message,
                timestamp,
                ld_context,
                disclosure,
            } => {
                stored.signed_message = Some(hex_encode(&message));
                stored.timestamp = timestamp;
                stored.signed_message_ld_context = Some(ld_context);
                stored.disclosure = Some(disclosure);
            }
            LogPayload::Disclosing(disclosure) => stored.disclosure = Some(disclosure),
            LogPayload::Issuing(commitment) => stored.issue_commitment = Some(commitment),
        }
        Ok(stored)
    }

    fn into_record(self) -> Result<LogRecord, LogError> {
        let kind = self.kind;
        let missing = |field: &str| LogError::MalformedRecord(format!("{kind} record lacks {field}"));

        let foreign = [
            ("removed", self.removed.is_some() && kind != LogKind::Removal),
            (
                "signed_message",
                self.signed_message.is_some() && kind != LogKind::Signing,
            ),
            ("timestamp", self.timestamp.is_some() && kind != LogKind::Signing),
            (
                "signed_message_ld_context",
                self.signed_message_ld_context.is_some() && kind != LogKind::Signing,
            ),
            (
                "issue_commitment",
                self.issue_commitment.is_some() && kind != LogKind::Issuing,
            ),
            (
                "disclosure",
                self.disclosure.is_some()
                    && !matches!(kind, LogKind::Disclosing | LogKind::Signing),
            ),
        ];
        if let Some((field, _)) = foreign.iter().find(|(_, present)| *present) {
            return Err(LogError::MalformedRecord(format!(
                "{kind} record carries {field}"
            )));
        }

        let payload = match kind {
            LogKind::Removal => LogPayload::Removal(self.removed.unwrap_or_default()),
            LogKind::Signing => LogPayload::Signing {
                message: hex_decode(&self.signed_message.ok_or_else(|| missing("signed_message"))?)?,
                timestamp: self.timestamp,
                ld_context: self
                    .signed_message_ld_context
                    .ok_or_else(|| missing("signed_message_ld_context"))?,
                disclosure: self.disclosure.ok_or_else(|| missing("disclosure"))?,
            },
            LogKind::Disclosing => {
                LogPayload::Disclosing(self.disclosure.ok_or_else(|| missing("disclosure"))?)
            }
            LogKind::Issuing => LogPayload::Issuing(
                self.issue_commitment
                    .ok_or_else(|| missing("issue_commitment"))?,
            ),
            LogKind::Unknown => return Err(LogError::InvalidKind(kind)),
        };
        let raw_request = self.request.map(|raw| raw.get().as_bytes().to_vec());

        LogRecord::from_parts(kind, self.time, self.version, raw_request, payload)
    }
}

impl Serialize for LogRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        StoredRecord::from_record(self)
            .map_err(ser::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for LogRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        StoredRecord::deserialize(deserializer)?
            .into_record()
            .map_err(de::Error::custom)
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn hex_decode(s: &str) -> Result<Vec<u8>, LogError> {
    if s.len() % 2 != 0 {
        return Err(LogError::MalformedRecord(format!(
            "hex string has odd length: {}",
            s.len()
        )));
    }
    (0..s.len())
        .step_by(2)
        .map(|i| {
            s.get(i..i + 2)
                .filter(|pair| pair.bytes().all(|b| b.is_ascii_hexdigit()))
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| LogError::MalformedRecord(format!("invalid hex at position {i}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use credlog_core::{BigNumber, CredentialTypeId, TranslatedString};
    use credlog_protocol::{BaseRequest, DisclosureRequest, SessionRequest, SignatureRequest};

    use super::*;
    use crate::payload::SessionResponse;

    fn at() -> Timestamp {
        Timestamp::parse("2026-06-15T14:00:00Z").unwrap()
    }

    fn signing_record() -> LogRecord {
        let request = SessionRequest::Signature(SignatureRequest {
            disclosure: DisclosureRequest {
                base: BaseRequest {
                    context: BigNumber::from(1),
                    nonce: BigNumber::from(2),
                },
                content: vec![],
            },
            message: "I agree".into(),
            timestamp: None,
        });
        LogRecord::for_session(
            LogKind::Signing,
            at(),
            Some(ProtocolVersion::new(2, 5)),
            &request,
            SessionResponse::Disclosure(Disclosure::default()),
        )
        .unwrap()
    }

    #[test]
    fn stored_layout_is_flat() {
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&signing_record()).unwrap()).unwrap();
        assert_eq!(json["type"], "signing");
        assert_eq!(json["version"], "2.5");
        assert_eq!(json["request"]["message"], "I agree");
        assert_eq!(json["signed_message"], "49206167726565");
        assert!(json.get("removed").is_none());
        assert!(json.get("issue_commitment").is_none());
    }

    #[test]
    fn restore_preserves_record_and_raw_bytes() {
        let record = signing_record();
        let text = serde_json::to_string(&record).unwrap();
        let back: LogRecord = serde_json::from_str(&text).unwrap();
        assert_eq!(back, record);
        assert_eq!(back.raw_request(), record.raw_request());
    }

    #[test]
    fn removal_round_trip() {
        let record = LogRecord::for_removal(
            at(),
            BTreeMap::from([(
                CredentialTypeId::parse("irma-demo.RU.studentCard").unwrap(),
                vec![TranslatedString::uniform("Radboud", &["en"])],
            )]),
        );
        let text = serde_json::to_string(&record).unwrap();
        assert!(!text.contains("\"request\""));
        let back: LogRecord = serde_json::from_str(&text).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn rejects_payload_of_other_kind() {
        let text = r#"{"type": "removal", "time": "2026-01-01T00:00:00Z", "disclosure": {"proofs": []}}"#;
        let err = serde_json::from_str::<LogRecord>(text).unwrap_err();
        assert!(err.to_string().contains("disclosure"));
    }

    #[test]
    fn rejects_missing_payload() {
        let text = r#"{"type": "disclosing", "time": "2026-01-01T00:00:00Z", "request": {}}"#;
        let err = serde_json::from_str::<LogRecord>(text).unwrap_err();
        assert!(err.to_string().contains("lacks disclosure"));
    }

    #[test]
    fn rejects_unknown_kind() {
        let text = r#"{"type": "unknown", "time": "2026-01-01T00:00:00Z"}"#;
        assert!(serde_json::from_str::<LogRecord>(text).is_err());
    }

    #[test]
    fn malformed_request_restores_but_fails_to_decode() {
        let text = r#"{"type": "disclosing", "time": "2026-01-01T00:00:00Z",
                       "request": {"content": "nope"}, "disclosure": {"proofs": []}}"#;
        let record: LogRecord = serde_json::from_str(text).unwrap();
        assert!(matches!(
            record.session_request(),
            Err(LogError::Decode { .. })
        ));
    }

    #[test]
    fn non_json_raw_request_cannot_be_stored() {
        let record = LogRecord::from_parts(
            LogKind::Disclosing,
            at(),
            None,
            Some(b"not json".to_vec()),
            LogPayload::Disclosing(Disclosure::default()),
        )
        .unwrap();
        assert!(serde_json::to_string(&record).is_err());
    }

    #[test]
    fn hex_helpers() {
        assert_eq!(hex_encode(&[0x00, 0xab, 0xff]), "00abff");
        assert_eq!(hex_decode("00abff").unwrap(), vec![0x00, 0xab, 0xff]);
        assert!(hex_decode("abc").is_err());
        assert!(hex_decode("zz").is_err());
    }
}
