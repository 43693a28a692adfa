//! # Big Numbers
//!
//! Session nonces, contexts and proof values are integers well beyond 64
//! bits. This layer never does arithmetic on them; it only stores, compares
//! and re-emits them. `BigNumber` therefore keeps the canonical decimal
//! string and validates it on construction.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A non-negative integer of arbitrary size in canonical decimal form.
///
/// Canonical means: ASCII digits only, no sign, and no leading zeros except
/// for the value `0` itself. Two `BigNumber`s are equal iff they denote the
/// same integer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BigNumber(String);

impl BigNumber {
    /// Parse a decimal string.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CoreError::InvalidNumber(s.to_string()));
        }
        let trimmed = s.trim_start_matches('0');
        if trimmed.is_empty() {
            return Ok(Self("0".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The decimal representation.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// ASCII bytes of the decimal representation, used when a value is
    /// mixed into a hash.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl From<u64> for BigNumber {
    fn from(v: u64) -> Self {
        Self(v.to_string())
    }
}

impl TryFrom<String> for BigNumber {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<BigNumber> for String {
    fn from(n: BigNumber) -> String {
        n.0
    }
}

impl std::fmt::Display for BigNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_large_values() {
        let n = BigNumber::parse("340282366920938463463374607431768211457").unwrap();
        assert_eq!(n.as_str(), "340282366920938463463374607431768211457");
    }

    #[test]
    fn strips_leading_zeros() {
        assert_eq!(BigNumber::parse("000420").unwrap().as_str(), "420");
        assert_eq!(BigNumber::parse("0000").unwrap().as_str(), "0");
    }

    #[test]
    fn rejects_non_digits() {
        assert!(BigNumber::parse("").is_err());
        assert!(BigNumber::parse("-1").is_err());
        assert!(BigNumber::parse("1e10").is_err());
        assert!(BigNumber::parse("12 3").is_err());
    }

    #[test]
    fn serde_as_string() {
        let n = BigNumber::from(42u64);
        assert_eq!(serde_json::to_string(&n).unwrap(), r#""42""#);
        assert!(serde_json::from_str::<BigNumber>(r#""x""#).is_err());
    }

    proptest! {
        #[test]
        fn agrees_with_u64(v in any::<u64>()) {
            let padded = format!("000{v}");
            prop_assert_eq!(BigNumber::parse(&padded).unwrap(), BigNumber::from(v));
        }
    }
}
