//! Configuration service.
//!
//! Loads `config.toml`, `secret.json` and `help.txt` from the configuration
//! directory and assembles the [`EngineConfig`] the core needs.

use std::fs;
use std::path::PathBuf;

use tracing::{debug, info};

use chatsh_core::error::{ChatshError, Result};
use chatsh_core::{Credential, EngineConfig};

use crate::dto::{AliasFile, AppConfig, SecretConfig};
use crate::paths::ChatshPaths;
use crate::storage::{AtomicTextFile, AtomicTomlFile, SecretStorage};

const BUILTIN_ALIASES_TEMPLATE: &str = r#"# Built-in aliases. Read at startup and on `load_aliases`; never written by chatsh.
#
# [aliases.up]
# command = "uptime"
# description = "Show load and uptime"
#
# [aliases.vol]
# command = "amixer set Master ${*}"
"#;

const SECRET_TEMPLATE: &str = r#"{
  "password": "change-me"
}
"#;

/// Loads configuration for one configuration directory.
#[derive(Debug, Clone)]
pub struct ConfigService {
    paths: ChatshPaths,
}

impl ConfigService {
    pub fn new(paths: ChatshPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &ChatshPaths {
        &self.paths
    }

    /// Loads `config.toml`. A missing file yields the defaults.
    pub fn load_app_config(&self) -> Result<AppConfig> {
        let path = self.paths.config_file();
        let config = AtomicTomlFile::<AppConfig>::new(path.clone()).load()?;
        if config.is_none() {
            debug!(path = %path.display(), "No config file, using defaults");
        }
        Ok(config.unwrap_or_default())
    }

    /// Loads `secret.json` with environment overrides applied.
    pub fn load_secrets(&self) -> Result<SecretConfig> {
        let secrets = SecretStorage::new(self.paths.secret_file())
            .load()
            .map_err(|e| ChatshError::config(format!("secret.json: {}", e)))?;
        Ok(secrets.with_env_overrides(|key| std::env::var(key).ok()))
    }

    /// Reads the optional operator help text. Blank files count as absent.
    pub fn load_help_text(&self) -> Result<Option<String>> {
        let text = AtomicTextFile::new(self.paths.help_file()).load()?;
        Ok(text
            .map(|t| t.trim_end().to_string())
            .filter(|t| !t.trim().is_empty()))
    }

    /// Builds the engine configuration. A missing login password is fatal.
    pub fn engine_config(&self, app: &AppConfig) -> Result<EngineConfig> {
        let secrets = self.load_secrets()?;
        build_engine_config(app, secrets, self.load_help_text()?)
    }

    /// Writes starter files that do not exist yet and returns their paths.
    pub fn init(&self) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(self.paths.root())?;
        let mut written = Vec::new();

        let config_path = self.paths.config_file();
        if !config_path.exists() {
            AtomicTomlFile::new(config_path.clone()).save(&AppConfig::default())?;
            written.push(config_path);
        }

        let secret_path = self.paths.secret_file();
        if !secret_path.exists() {
            AtomicTextFile::new(secret_path.clone()).save(SECRET_TEMPLATE)?;
            restrict_permissions(&secret_path)?;
            written.push(secret_path);
        }

        let builtin_path = self.paths.builtin_aliases_file();
        if !builtin_path.exists() {
            AtomicTextFile::new(builtin_path.clone()).save(BUILTIN_ALIASES_TEMPLATE)?;
            written.push(builtin_path);
        }

        let user_path = self.paths.user_aliases_file();
        if !user_path.exists() {
            AtomicTomlFile::new(user_path.clone()).save(&AliasFile::default())?;
            written.push(user_path);
        }

        for path in &written {
            info!(path = %path.display(), "Wrote starter file");
        }
        Ok(written)
    }
}

/// Combines the application config, secrets and help text.
pub fn build_engine_config(
    app: &AppConfig,
    secrets: SecretConfig,
    help_text: Option<String>,
) -> Result<EngineConfig> {
    let password = secrets
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| {
            ChatshError::config(
                "no login password configured; set it in secret.json or CHATSH_PASSWORD",
            )
        })?;

    let mut config = EngineConfig::new(Credential::new(password));
    config.sudo_password = secrets
        .sudo_password
        .filter(|p| !p.is_empty())
        .map(Credential::new);
    config.max_reply_bytes = app.engine.max_reply_bytes;
    config.fallback = app.engine.fallback;
    config.help_text = help_text;
    Ok(config)
}

#[cfg(unix)]
fn restrict_permissions(path: &std::path::Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &std::path::Path) -> Result<()> {
    Ok(())
}
