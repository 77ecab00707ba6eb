//! Email address value object.

use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{DomainError, DomainResult};

/// Case-insensitive email address, normalized to lowercase.
///
/// `parse` validates; deserialization only normalizes, so a malformed entry
/// in stored data cannot wedge snapshot decoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Parse and normalize. Rejects empty strings and strings without `@`.
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(DomainError::validation("email is required"));
        }
        if !normalized.contains('@') {
            return Err(DomainError::validation("invalid email format"));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Domain part after `@`, e.g. "gmail.com".
    pub fn domain(&self) -> &str {
        self.0.rsplit('@').next().unwrap_or("")
    }

    /// Local part before `@`; used as a fallback display name.
    pub fn local_part(&self) -> &str {
        self.0.split('@').next().unwrap_or(&self.0)
    }
}

impl core::fmt::Display for Email {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Email {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'de> Deserialize<'de> for Email {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self(raw.trim().to_lowercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalizes_case_and_whitespace() {
        let email = Email::parse("  Alice@GMail.com ").unwrap();
        assert_eq!(email.as_str(), "alice@gmail.com");
        assert_eq!(email.domain(), "gmail.com");
        assert_eq!(email.local_part(), "alice");
    }

    #[test]
    fn parse_rejects_empty_and_malformed() {
        assert!(Email::parse("   ").is_err());
        assert!(Email::parse("not-an-email").is_err());
    }

    #[test]
    fn normalized_emails_compare_case_insensitively() {
        let a = Email::parse("A@Gmail.com").unwrap();
        let b = Email::parse("a@gmail.com").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn deserialization_normalizes_without_failing() {
        let email: Email = serde_json::from_str("\" Bob@School.ORG \"").unwrap();
        assert_eq!(email.as_str(), "bob@school.org");
    }
}
