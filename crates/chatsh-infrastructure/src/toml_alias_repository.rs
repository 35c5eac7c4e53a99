//! TOML-based AliasRepository implementation.

use std::path::PathBuf;

use chatsh_core::alias::{AliasRepository, AliasTable};
use chatsh_core::error::Result;

use crate::dto::AliasFile;
use crate::paths::ChatshPaths;
use crate::storage::AtomicTomlFile;

/// Stores the built-in and user alias tables in two TOML files.
///
/// The built-in file is only ever read. The user file is rewritten in full
/// after every mutation.
pub struct TomlAliasRepository {
    builtin: AtomicTomlFile<AliasFile>,
    user: AtomicTomlFile<AliasFile>,
}

impl TomlAliasRepository {
    pub fn new(builtin_path: PathBuf, user_path: PathBuf) -> Self {
        Self {
            builtin: AtomicTomlFile::new(builtin_path),
            user: AtomicTomlFile::new(user_path),
        }
    }

    pub fn from_paths(paths: &ChatshPaths) -> Self {
        Self::new(paths.builtin_aliases_file(), paths.user_aliases_file())
    }
}

impl AliasRepository for TomlAliasRepository {
    fn load_builtin(&self) -> Result<AliasTable> {
        Ok(self.builtin.load()?.unwrap_or_default().into())
    }

    fn load_user(&self) -> Result<AliasTable> {
        Ok(self.user.load()?.unwrap_or_default().into())
    }

    fn save_user(&self, table: &AliasTable) -> Result<()> {
        self.user.save(&AliasFile::from(table))?;
        Ok(())
    }
}
