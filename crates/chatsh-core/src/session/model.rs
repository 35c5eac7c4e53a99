//! Session identity model.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ChatshError;

/// Transport-assigned identifier of a caller (for example a chat id).
///
/// Opaque to the engine; compared and persisted as text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for SessionId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for SessionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for SessionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl FromStr for SessionId {
    type Err = ChatshError;

    /// Parses a persisted identifier.
    ///
    /// Identifiers are stored comma-joined, so they may not contain commas or
    /// whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.contains(',') || s.contains(char::is_whitespace) {
            return Err(ChatshError::Serialization {
                format: "session id".to_string(),
                message: format!("invalid session identifier '{}'", s),
            });
        }
        Ok(Self(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_ids_compare_as_text() {
        assert_eq!(SessionId::from(12345_i64), SessionId::from("12345"));
        assert_eq!(SessionId::from(-100_i64).to_string(), "-100");
    }

    #[test]
    fn test_parse_rejects_separators() {
        assert!("12,34".parse::<SessionId>().is_err());
        assert!("".parse::<SessionId>().is_err());
        assert_eq!(" 42 ".parse::<SessionId>().unwrap(), SessionId::new("42"));
    }
}
