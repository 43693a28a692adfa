//! # Protocol Versions
//!
//! Sessions negotiate a `major.minor` protocol version. The version matters
//! after the fact because older sessions issued credentials with an older
//! metadata-attribute layout.

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// Metadata attribute layout used by protocol versions below 2.3.
pub const LEGACY_METADATA_VERSION: u8 = 0x02;

/// Metadata attribute layout used by current protocol versions.
pub const METADATA_VERSION: u8 = 0x03;

/// A negotiated protocol version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProtocolVersion {
    /// Major version.
    pub major: u32,
    /// Minor version.
    pub minor: u32,
}

impl ProtocolVersion {
    /// Construct a version.
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Parse `"major.minor"`.
    pub fn parse(s: &str) -> Result<Self, ProtocolError> {
        let invalid = || ProtocolError::InvalidVersion(s.to_string());
        let (major, minor) = s.split_once('.').ok_or_else(invalid)?;
        let major = major.parse().map_err(|_| invalid())?;
        let minor = minor.parse().map_err(|_| invalid())?;
        Ok(Self { major, minor })
    }

    /// True if `self` is strictly older than `major.minor`.
    pub fn below(&self, major: u32, minor: u32) -> bool {
        *self < Self::new(major, minor)
    }

    /// Metadata attribute layout for credentials issued in a session with
    /// this version. An unrecorded version is treated as current.
    pub fn metadata_version(version: Option<&Self>) -> u8 {
        match version {
            Some(v) if v.below(2, 3) => LEGACY_METADATA_VERSION,
            _ => METADATA_VERSION,
        }
    }
}

impl TryFrom<String> for ProtocolVersion {
    type Error = ProtocolError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ProtocolVersion> for String {
    fn from(v: ProtocolVersion) -> String {
        v.to_string()
    }
}

impl std::fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
