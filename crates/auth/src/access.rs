use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse two-tier permission carried by a principal.
///
/// Ordering is meaningful: `Write` grants everything `Read` grants.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    Read,
    Write,
}

impl AccessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::Read => "read",
            AccessLevel::Write => "write",
        }
    }

    /// Whether a holder of `self` may perform an operation requiring `required`.
    pub fn grants(&self, required: AccessLevel) -> bool {
        *self >= required
    }
}

impl core::fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown access level '{0}' (expected 'read' or 'write')")]
pub struct ParseAccessLevelError(pub String);

impl FromStr for AccessLevel {
    type Err = ParseAccessLevelError;

    /// Case-sensitive, matching what the credential table stores.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read" => Ok(AccessLevel::Read),
            "write" => Ok(AccessLevel::Write),
            other => Err(ParseAccessLevelError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_grants_read_but_not_the_reverse() {
        assert!(AccessLevel::Write.grants(AccessLevel::Read));
        assert!(AccessLevel::Write.grants(AccessLevel::Write));
        assert!(AccessLevel::Read.grants(AccessLevel::Read));
        assert!(!AccessLevel::Read.grants(AccessLevel::Write));
    }

    #[test]
    fn parse_is_case_sensitive() {
        assert_eq!("write".parse::<AccessLevel>(), Ok(AccessLevel::Write));
        assert!("Write".parse::<AccessLevel>().is_err());
        assert!("".parse::<AccessLevel>().is_err());
    }
}
