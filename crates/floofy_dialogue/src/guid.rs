// SPDX-License-Identifier: MIT OR Apache-2.0
//! Stable 128-bit identifiers for choices.
//!
//! Local ids are reused across edits; a [`Guid`] is assigned once and keeps
//! identifying the same choice across sessions. The textual form is the
//! canonical `XXXXXXXX-XXXX-XXXX-XXXX-XXXXXXXXXXXX` in uppercase hex.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Length of the canonical textual form
pub const GUID_STRING_LEN: usize = 36;

/// A 128-bit globally unique identifier. The all-zero value means unassigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Guid([u8; 16]);

impl Guid {
    /// Generate a new random, valid GUID
    pub fn new_random() -> Self {
        Self(Uuid::new_v4().into_bytes())
    }

    /// The reserved all-zero GUID
    pub const fn nil() -> Self {
        Self([0; 16])
    }

    /// Wrap raw bytes
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Whether this is anything other than the all-zero value
    pub fn is_valid(&self) -> bool {
        self.0 != [0; 16]
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:X}", Uuid::from_bytes(self.0).hyphenated())
    }
}

/// Error when parsing a GUID from text
#[derive(Debug, Error)]
pub enum GuidParseError {
    /// Input is not 36 characters long
    #[error("GUID must be {GUID_STRING_LEN} characters, got {0}")]
    InvalidLength(usize),

    /// Separators or hex digits are wrong
    #[error("Malformed GUID: {0}")]
    Malformed(#[from] uuid::Error),
}

impl FromStr for Guid {
    type Err = GuidParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Only the hyphenated form has this length; simple, braced and urn do not
        if s.len() != GUID_STRING_LEN {
            return Err(GuidParseError::InvalidLength(s.len()));
        }
        let uuid = Uuid::parse_str(s)?;
        Ok(Self(uuid.into_bytes()))
    }
}

impl Serialize for Guid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Guid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_A: &str = "F964FB23-022B-48CD-99C4-52EAC595B9B0";
    const VALID_B: &str = "9440F8C9-192F-4197-A361-D6E0FA2A3562";

    #[test]
    fn test_default_is_invalid() {
        assert!(!Guid::default().is_valid());
        assert_eq!(Guid::default(), Guid::nil());
    }

    #[test]
    fn test_random_is_valid() {
        let a = Guid::new_random();
        let b = Guid::new_random();
        assert!(a.is_valid());
        assert_ne!(a, b);
    }

    #[test]
    fn test_to_string_matches_source() {
        let guid: Guid = VALID_A.parse().unwrap();
        assert!(guid.is_valid());
        assert_eq!(guid.to_string(), VALID_A);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        let upper: Guid = VALID_B.parse().unwrap();
        let lower: Guid = VALID_B.to_lowercase().parse().unwrap();
        assert_eq!(upper, lower);
        assert_eq!(lower.to_string(), VALID_B);
    }

    #[test]
    fn test_byte_order_follows_text() {
        let guid: Guid = "47D655C2-5A0B-4830-AD70-6E22E9A2A820".parse().unwrap();
        assert_eq!(guid.as_bytes()[0], 0x47);
        assert_eq!(guid.as_bytes()[4], 0x5A);
        assert_eq!(guid.as_bytes()[15], 0x20);
    }

    #[test]
    fn test_rejects_other_forms() {
        assert!(matches!("".parse::<Guid>(), Err(GuidParseError::InvalidLength(0))));
        assert!("F964FB23022B48CD99C452EAC595B9B0".parse::<Guid>().is_err());
        assert!("{F964FB23-022B-48CD-99C4-52EAC595B9B0}".parse::<Guid>().is_err());
        assert!(matches!(
            "G964FB23-022B-48CD-99C4-52EAC595B9B0".parse::<Guid>(),
            Err(GuidParseError::Malformed(_))
        ));
    }

    #[test]
    fn test_different_guids_compare_unequal() {
        let a: Guid = VALID_A.parse().unwrap();
        let b: Guid = VALID_B.parse().unwrap();
        assert_ne!(a, b);
        assert_eq!(a, Guid::from_bytes(*a.as_bytes()));
    }
}
