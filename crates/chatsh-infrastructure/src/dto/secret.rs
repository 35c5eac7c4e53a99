//! Secret file format (`secret.json`).

use serde::{Deserialize, Serialize};

/// Secrets read at startup. Never written by chatsh.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecretConfig {
    /// Secret expected by `login`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Credential handed to `sudo` over stdin
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sudo_password: Option<String>,
}

impl SecretConfig {
    /// Overrides file values with non-empty values from the environment.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(password) = lookup("CHATSH_PASSWORD").filter(|v| !v.is_empty()) {
            self.password = Some(password);
        }
        if let Some(sudo) = lookup("CHATSH_SUDO_PASSWORD").filter(|v| !v.is_empty()) {
            self.sudo_password = Some(sudo);
        }
        self
    }
}
