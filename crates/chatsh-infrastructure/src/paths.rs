//! Path management for chatsh configuration and state files.

use std::path::{Path, PathBuf};

/// Environment variable overriding the configuration directory.
pub const CONFIG_DIR_ENV: &str = "CHATSH_CONFIG_DIR";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home/config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Locations of every file chatsh reads or writes.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/chatsh/
/// ├── config.toml              # Application configuration
/// ├── secret.json              # Login password and sudo credential
/// ├── builtin_aliases.toml     # Operator aliases (never written)
/// ├── user_aliases.toml        # Aliases created from the chat
/// ├── authorized_sessions      # Comma-joined authorized session ids
/// ├── help.txt                 # Optional help text
/// └── logs/
///     └── chatsh.log.YYYY-MM-DD
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatshPaths {
    root: PathBuf,
}

impl ChatshPaths {
    /// Uses `root` as the configuration directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolves the configuration directory.
    ///
    /// Precedence: explicit override, then `CHATSH_CONFIG_DIR`, then the
    /// platform config directory (`~/.config/chatsh` on Linux).
    pub fn resolve(override_dir: Option<PathBuf>) -> Result<Self, PathError> {
        if let Some(dir) = override_dir {
            return Ok(Self::new(dir));
        }
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::new(PathBuf::from(dir)));
        }
        dirs::config_dir()
            .map(|dir| Self::new(dir.join("chatsh")))
            .ok_or(PathError::ConfigDirNotFound)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    /// # Security Note
    ///
    /// Ensure this file has appropriate permissions (e.g., 600).
    pub fn secret_file(&self) -> PathBuf {
        self.root.join("secret.json")
    }

    pub fn builtin_aliases_file(&self) -> PathBuf {
        self.root.join("builtin_aliases.toml")
    }

    pub fn user_aliases_file(&self) -> PathBuf {
        self.root.join("user_aliases.toml")
    }

    pub fn sessions_file(&self) -> PathBuf {
        self.root.join("authorized_sessions")
    }

    pub fn help_file(&self) -> PathBuf {
        self.root.join("help.txt")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.root.join("logs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_override_wins() {
        let paths = ChatshPaths::resolve(Some(PathBuf::from("/srv/chatsh"))).unwrap();
        assert_eq!(paths.root(), Path::new("/srv/chatsh"));
        assert_eq!(paths.config_file(), PathBuf::from("/srv/chatsh/config.toml"));
        assert_eq!(
            paths.sessions_file(),
            PathBuf::from("/srv/chatsh/authorized_sessions")
        );
    }

    #[test]
    fn test_files_live_under_root() {
        let paths = ChatshPaths::new("/x");
        for file in [
            paths.secret_file(),
            paths.builtin_aliases_file(),
            paths.user_aliases_file(),
            paths.help_file(),
            paths.log_dir(),
        ] {
            assert!(file.starts_with("/x"));
        }
    }
}
