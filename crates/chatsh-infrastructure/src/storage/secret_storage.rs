//! Secret configuration file storage.
//!
//! Loads `secret.json`. The file is read-only from chatsh's side.

use std::fs;
use std::path::PathBuf;

use crate::dto::SecretConfig;

/// Errors that can occur during secret storage operations.
#[derive(Debug)]
pub enum SecretStorageError {
    /// File I/O error.
    IoError(std::io::Error),
    /// JSON parsing error.
    ParseError(serde_json::Error),
}

impl std::fmt::Display for SecretStorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecretStorageError::IoError(e) => write!(f, "I/O error: {}", e),
            SecretStorageError::ParseError(e) => write!(f, "JSON parse error: {}", e),
        }
    }
}

impl std::error::Error for SecretStorageError {}

impl From<std::io::Error> for SecretStorageError {
    fn from(e: std::io::Error) -> Self {
        SecretStorageError::IoError(e)
    }
}

impl From<serde_json::Error> for SecretStorageError {
    fn from(e: serde_json::Error) -> Self {
        SecretStorageError::ParseError(e)
    }
}

/// Storage for the secret file.
///
/// # Security Note
///
/// The file is plaintext JSON and should be readable by its owner only.
/// Secret values must never appear in logs or error messages.
pub struct SecretStorage {
    path: PathBuf,
}

impl SecretStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads the secrets. A missing file yields empty secrets so that
    /// environment variables alone can configure them.
    pub fn load(&self) -> Result<SecretConfig, SecretStorageError> {
        if !self.path.exists() {
            return Ok(SecretConfig::default());
        }

        let content = fs::read_to_string(&self.path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}
