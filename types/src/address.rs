//! Member address type with `civ_` prefix.

use crate::error::CivicError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A member address, always prefixed with `civ_`.
///
/// Addresses order lexicographically by their string form. Ballot iteration
/// relies on this order being identical on every replica.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MemberAddress(String);

impl MemberAddress {
    /// The standard prefix for all member addresses.
    pub const PREFIX: &'static str = "civ_";

    /// Maximum length of the body that follows the prefix.
    pub const MAX_BODY_LEN: usize = 64;

    /// Create a new member address from a raw string.
    ///
    /// # Panics
    /// Panics if the string is not a well-formed address. Use [`MemberAddress::parse`]
    /// for untrusted input.
    pub fn new(raw: impl Into<String>) -> Self {
        let s = raw.into();
        assert!(Self::is_well_formed(&s), "malformed member address: {s}");
        Self(s)
    }

    /// Parse an untrusted string into an address.
    pub fn parse(raw: &str) -> Result<Self, CivicError> {
        if raw.is_empty() {
            return Err(CivicError::InvalidAddress("empty address".to_string()));
        }
        if !Self::is_well_formed(raw) {
            return Err(CivicError::InvalidAddress(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate that this address is well-formed.
    pub fn is_valid(&self) -> bool {
        Self::is_well_formed(&self.0)
    }

    fn is_well_formed(s: &str) -> bool {
        let Some(body) = s.strip_prefix(Self::PREFIX) else {
            return false;
        };
        !body.is_empty()
            && body.len() <= Self::MAX_BODY_LEN
            && body
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
    }
}

impl fmt::Display for MemberAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MemberAddress {
    type Err = CivicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for MemberAddress {
    type Error = CivicError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_address() {
        let addr = MemberAddress::parse("civ_alice01").unwrap();
        assert_eq!(addr.as_str(), "civ_alice01");
        assert!(addr.is_valid());
    }

    #[test]
    fn rejects_empty_and_malformed() {
        assert!(MemberAddress::parse("").is_err());
        assert!(MemberAddress::parse("civ_").is_err());
        assert!(MemberAddress::parse("brst_alice").is_err());
        assert!(MemberAddress::parse("civ_Alice").is_err());
        assert!(MemberAddress::parse("civ_al ice").is_err());
        let long = format!("civ_{}", "a".repeat(MemberAddress::MAX_BODY_LEN + 1));
        assert!(MemberAddress::parse(&long).is_err());
    }

    #[test]
    fn orders_by_string_form() {
        let a = MemberAddress::new("civ_a");
        let b = MemberAddress::new("civ_b");
        assert!(a < b);
    }

    #[test]
    #[should_panic(expected = "malformed member address")]
    fn new_panics_on_malformed() {
        MemberAddress::new("nope");
    }
}
