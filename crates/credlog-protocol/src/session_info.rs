//! # Session Initiation Messages
//!
//! [`Qr`] is the session pointer a requestor shows the holder. [`SessionInfo`]
//! is the first message the holder fetches from it.
//!
//! ## Legacy key map
//!
//! Older peers serialize the issuer key map of `SessionInfo` not as a JSON
//! object but as a list of pairs whose first element wraps the issuer id:
//!
//! ```json
//! "keys": [[{"identifier": "irma-demo.RU"}, 2], [{"identifier": "irma-demo.MijnOverheid"}, 1]]
//! ```
//!
//! `SessionInfo` reads and writes exactly that shape. Any deviation is a
//! [`ProtocolError::LegacyFormat`].
//!
//! Numeric nonces are read from the raw JSON text, so `SessionInfo` decodes
//! from bytes or a string only, not from a `serde_json::Value`.

use std::collections::BTreeMap;

use credlog_core::{BigNumber, IssuerId};
use serde::de;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::value::RawValue;
use serde_json::Value;

use crate::action::Action;
use crate::error::ProtocolError;
use crate::version::ProtocolVersion;

/// A session pointer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Qr {
    /// URL of the session on the requestor's server.
    #[serde(rename = "u")]
    pub url: String,
    /// Session type.
    #[serde(rename = "irmaqr")]
    pub action: Action,
    /// Lowest protocol version the server accepts.
    #[serde(rename = "v")]
    pub protocol_version: ProtocolVersion,
    /// Highest protocol version the server accepts.
    #[serde(rename = "vmax")]
    pub protocol_max_version: ProtocolVersion,
}

/// The first message of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireSessionInfo", into = "WireSessionInfo")]
pub struct SessionInfo {
    /// The signed session request.
    pub jwt: String,
    /// Session nonce.
    pub nonce: BigNumber,
    /// Session context.
    pub context: BigNumber,
    /// Public key counter to use per issuer.
    pub keys: BTreeMap<IssuerId, u32>,
}

impl SessionInfo {
    /// Decode a session-info message.
    pub fn from_json(bytes: &[u8]) -> Result<Self, ProtocolError> {
        let wire: WireSessionInfo = serde_json::from_slice(bytes)?;
        Self::try_from(wire)
    }
}

/// A nonce or context on the wire. Current peers send a decimal string;
/// legacy peers send a bare JSON integer, which may exceed 64 bits. The
/// number token is read verbatim so no digits are lost.
struct WireNumber(BigNumber);

impl<'de> Deserialize<'de> for WireNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        let token = raw.get();
        let digits = token
            .strip_prefix('"')
            .and_then(|t| t.strip_suffix('"'))
            .unwrap_or(token);
        BigNumber::parse(digits).map(Self).map_err(de::Error::custom)
    }
}

impl Serialize for WireNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

#[derive(Serialize, Deserialize)]
struct WireSessionInfo {
    jwt: String,
    nonce: WireNumber,
    context: WireNumber,
    #[serde(default)]
    keys: Vec<Value>,
}

impl TryFrom<WireSessionInfo> for SessionInfo {
    type Error = ProtocolError;

    fn try_from(wire: WireSessionInfo) -> Result<Self, Self::Error> {
        let mut keys = BTreeMap::new();
        for (position, pair) in wire.keys.iter().enumerate() {
            let (issuer, counter) = key_pair(pair)
                .ok_or_else(|| ProtocolError::LegacyFormat(format!("bad key pair at {position}: {pair}")))?;
            let issuer = IssuerId::parse(issuer)?;
            keys.insert(issuer, counter);
        }
        Ok(Self {
            jwt: wire.jwt,
            nonce: wire.nonce.0,
            context: wire.context.0,
            keys,
        })
    }
}

fn key_pair(pair: &Value) -> Option<(&str, u32)> {
    let [id, counter] = pair.as_array()?.as_slice() else {
        return None;
    };
    let issuer = id.as_object()?.get("identifier")?.as_str()?;
    Some((issuer, key_counter(counter)?))
}

/// Counters arrive as integers, or as integral floats from peers that
/// decode every JSON number as a double.
fn key_counter(value: &Value) -> Option<u32> {
    if let Some(n) = value.as_u64() {
        return u32::try_from(n).ok();
    }
    let f = value.as_f64()?;
    if f.fract() != 0.0 || !(0.0..=f64::from(u32::MAX)).contains(&f) {
        return None;
    }
    // Integral and in range, so the cast is exact.
    Some(f as u32)
}

impl From<SessionInfo> for WireSessionInfo {
    fn from(info: SessionInfo) -> Self {
        let keys = info
            .keys
            .into_iter()
            .map(|(issuer, counter)| {
                serde_json::json!([{ "identifier": issuer.as_str() }, counter])
            })
            .collect();
        Self {
            jwt: info.jwt,
            nonce: WireNumber(info.nonce),
            context: WireNumber(info.context),
            keys,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEGACY: &str = r#"{
        "jwt": "eyJhbGciOiJub25lIn0.e30.",
        "nonce": 12345678901234567890,
        "context": 1,
        "keys": [[{"identifier": "irma-demo.RU"}, 2], [{"identifier": "irma-demo.MijnOverheid"}, 1]]
    }"#;

    #[test]
    fn decodes_pair_list_keys() {
        let info = SessionInfo::from_json(LEGACY.as_bytes()).unwrap();
        assert_eq!(info.keys.len(), 2);
        assert_eq!(info.keys[&IssuerId::parse("irma-demo.RU").unwrap()], 2);
        assert_eq!(info.keys[&IssuerId::parse("irma-demo.MijnOverheid").unwrap()], 1);
        assert_eq!(info.nonce.as_str(), "12345678901234567890");
        assert_eq!(info.context, BigNumber::from(1));
    }

    #[test]
    fn string_nonces_accepted() {
        let json = r#"{"jwt": "x", "nonce": "99999999999999999999999", "context": "7", "keys": []}"#;
        let info = SessionInfo::from_json(json.as_bytes()).unwrap();
        assert_eq!(info.nonce.as_str(), "99999999999999999999999");
        assert!(info.keys.is_empty());
    }

    #[test]
    fn encodes_same_legacy_shape() {
        let info = SessionInfo::from_json(LEGACY.as_bytes()).unwrap();
        let json = serde_json::to_value(&info).unwrap();
        let keys = json["keys"].as_array().unwrap();
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0][0]["identifier"], "irma-demo.MijnOverheid");
        assert_eq!(keys[0][1], 1);

        assert_eq!(json["nonce"], "12345678901234567890");

        let back: SessionInfo = serde_json::from_str(&json.to_string()).unwrap();
        assert_eq!(back, info);
    }

    #[test]
    fn numeric_nonce_beyond_u64() {
        let json = r#"{"jwt": "x", "nonce": 1208925819614629174706176, "context": 18446744073709551616, "keys": []}"#;
        let info = SessionInfo::from_json(json.as_bytes()).unwrap();
        assert_eq!(info.nonce.as_str(), "1208925819614629174706176");
        assert_eq!(info.context.as_str(), "18446744073709551616");
    }

    #[test]
    fn rejects_non_integer_nonces() {
        for nonce in ["-5", "1.5", "1e3", "true", r#""0x10""#, "null"] {
            let json = format!(r#"{{"jwt": "x", "nonce": {nonce}, "context": 1, "keys": []}}"#);
            assert!(SessionInfo::from_json(json.as_bytes()).is_err(), "{nonce} accepted");
        }
    }

    #[test]
    fn integral_float_counters_accepted() {
        let json = r#"{"jwt": "x", "nonce": 1, "context": 1, "keys": [[{"identifier": "irma-demo.RU"}, 2.0]]}"#;
        let info = SessionInfo::from_json(json.as_bytes()).unwrap();
        assert_eq!(info.keys[&IssuerId::parse("irma-demo.RU").unwrap()], 2);
    }

    #[test]
    fn rejects_object_keys() {
        let json = r#"{"jwt": "x", "nonce": 1, "context": 1, "keys": [{"irma-demo.RU": 2}]}"#;
        let err = SessionInfo::from_json(json.as_bytes()).unwrap_err();
        assert!(matches!(err, ProtocolError::LegacyFormat(_)));
    }

    #[test]
    fn rejects_malformed_pairs() {
        for keys in [
            r#"[["irma-demo.RU", 2]]"#,
            r#"[[{"id": "irma-demo.RU"}, 2]]"#,
            r#"[[{"identifier": "irma-demo.RU"}, "2"]]"#,
            r#"[[{"identifier": "irma-demo.RU"}, -1]]"#,
            r#"[[{"identifier": "irma-demo.RU"}, 2.5]]"#,
            r#"[[{"identifier": "irma-demo.RU"}, 4294967296.0]]"#,
            r#"[[{"identifier": "irma-demo.RU"}]]"#,
            r#"[[{"identifier": "irma-demo.RU"}, 2, 3]]"#,
        ] {
            let json = format!(r#"{{"jwt": "x", "nonce": 1, "context": 1, "keys": {keys}}}"#);
            let err = SessionInfo::from_json(json.as_bytes()).unwrap_err();
            assert!(matches!(err, ProtocolError::LegacyFormat(_)), "{keys} accepted");
        }
    }

    #[test]
    fn serde_deserialize_reports_legacy_error() {
        let json = r#"{"jwt": "x", "nonce": 1, "context": 1, "keys": [[1, 2]]}"#;
        let err = serde_json::from_str::<SessionInfo>(json).unwrap_err();
        assert!(err.to_string().contains("legacy session info"));
    }

    #[test]
    fn qr_wire_names() {
        let qr: Qr = serde_json::from_str(
            r#"{"u": "https://example.org/irma/session/abc", "irmaqr": "disclosing", "v": "2.1", "vmax": "2.5"}"#,
        )
        .unwrap();
        assert_eq!(qr.action, Action::Disclosing);
        assert_eq!(qr.protocol_max_version, ProtocolVersion::new(2, 5));
        let json = serde_json::to_value(&qr).unwrap();
        assert_eq!(json["irmaqr"], "disclosing");
        assert_eq!(json["v"], "2.1");
    }
}
