//! Error types for chatsh.

use thiserror::Error;

/// A shared error type for the chatsh domain.
///
/// Line-level failures never escape the engine as this type; they are turned
/// into reply text. It is used by stores and repositories, where the caller
/// decides whether a failure is fatal (startup) or merely logged (runtime).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChatshError {
    /// Entity not found error with type information
    #[error("{entity_type} '{id}' not found")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// An alias name collides with a reserved verb
    #[error("'{0}' is a reserved word and cannot be used as an alias")]
    ReservedName(String),

    /// Malformed verb syntax
    #[error("Usage: {0}")]
    Usage(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ChatshError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a Usage error
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a reserved-name rejection
    pub fn is_reserved_name(&self) -> bool {
        matches!(self, Self::ReservedName(_))
    }
}

impl From<std::io::Error> for ChatshError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for ChatshError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ChatshError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for ChatshError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<anyhow::Error> for ChatshError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, ChatshError>`.
pub type Result<T> = std::result::Result<T, ChatshError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ChatshError = io.into();
        assert!(matches!(err, ChatshError::Io { .. }));
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_not_found_display() {
        let err = ChatshError::not_found("alias", "greet");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "alias 'greet' not found");
    }

    #[test]
    fn test_reserved_name_display() {
        let err = ChatshError::ReservedName("sudo".to_string());
        assert!(err.is_reserved_name());
        assert!(err.to_string().contains("sudo"));
    }
}
