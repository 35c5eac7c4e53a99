//! The alias store: both tables, their lifecycle and their mutation rules.

use std::sync::Arc;

use tracing::{info, warn};

use crate::alias::model::{AliasEntry, AliasSource, AliasTable, normalize_name};
use crate::alias::repository::AliasRepository;
use crate::alias::reserved::is_reserved;
use crate::error::{ChatshError, Result};

/// Owns the built-in and user alias tables.
///
/// The in-memory tables are the source of truth for the life of the process.
/// Every user-table mutation is written through to the repository; a failed
/// write is logged and the store keeps working without durability.
pub struct AliasStore {
    builtin: AliasTable,
    user: AliasTable,
    repository: Arc<dyn AliasRepository>,
}

impl AliasStore {
    /// Loads both tables from `repository`.
    ///
    /// Missing or malformed sources yield empty tables; loading never fails.
    pub fn load(repository: Arc<dyn AliasRepository>) -> Self {
        let builtin = load_builtin(repository.as_ref());
        let user = load_user(repository.as_ref());
        info!(
            builtin = builtin.len(),
            user = user.len(),
            "Loaded alias tables"
        );
        Self {
            builtin,
            user,
            repository,
        }
    }

    /// Re-reads both tables from the repository.
    pub fn reload(&mut self) {
        self.builtin = load_builtin(self.repository.as_ref());
        self.user = load_user(self.repository.as_ref());
        info!(
            builtin = self.builtin.len(),
            user = self.user.len(),
            "Reloaded alias tables"
        );
    }

    /// Resolves a name, consulting the built-in table first.
    pub fn lookup(&self, name: &str) -> Option<(&AliasEntry, AliasSource)> {
        if let Some(entry) = self.builtin.get(name) {
            return Some((entry, AliasSource::Builtin));
        }
        self.user.get(name).map(|entry| (entry, AliasSource::User))
    }

    /// Creates a user alias, or replaces the template of an existing one.
    ///
    /// A prior description is kept. Reserved verb names are rejected and
    /// leave both tables untouched.
    pub fn create_or_update(&mut self, name: &str, template: &str) -> Result<()> {
        let key = normalize_name(name);
        if key.is_empty() || key.contains(char::is_whitespace) {
            return Err(ChatshError::usage("alias <name> <command>"));
        }
        if is_reserved(&key) {
            return Err(ChatshError::ReservedName(key));
        }
        let template = template.trim();
        if template.is_empty() {
            return Err(ChatshError::usage("alias <name> <command>"));
        }

        match self.user.get_mut(&key) {
            Some(entry) => entry.command = template.to_string(),
            None => {
                self.user.insert(&key, AliasEntry::new(template));
            }
        }
        if self.builtin.contains(&key) {
            warn!(alias = %key, "User alias is shadowed by a built-in alias");
        }
        info!(alias = %key, "Saved user alias");
        self.persist();
        Ok(())
    }

    /// Sets the description of a user alias.
    ///
    /// Built-in aliases are not describable; naming one yields `NotFound`.
    pub fn set_description(&mut self, name: &str, text: &str) -> Result<()> {
        let entry = self
            .user
            .get_mut(name)
            .ok_or_else(|| ChatshError::not_found("alias", normalize_name(name)))?;
        entry.description = Some(text.trim().to_string());
        info!(alias = %normalize_name(name), "Described user alias");
        self.persist();
        Ok(())
    }

    pub fn builtin(&self) -> &AliasTable {
        &self.builtin
    }

    pub fn user(&self) -> &AliasTable {
        &self.user
    }

    fn persist(&self) {
        if let Err(e) = self.repository.save_user(&self.user) {
            warn!(error = %e, "Failed to persist user aliases; keeping in-memory table");
        }
    }
}

fn load_builtin(repository: &dyn AliasRepository) -> AliasTable {
    let table = repository.load_builtin().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load built-in aliases; using an empty table");
        AliasTable::new()
    });
    drop_reserved(table, AliasSource::Builtin)
}

fn load_user(repository: &dyn AliasRepository) -> AliasTable {
    let table = repository.load_user().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load user aliases; using an empty table");
        AliasTable::new()
    });
    drop_reserved(table, AliasSource::User)
}

fn drop_reserved(table: AliasTable, source: AliasSource) -> AliasTable {
    table
        .iter()
        .filter(|(name, _)| {
            let reserved = is_reserved(name);
            if reserved {
                warn!(alias = %name, ?source, "Skipping alias with a reserved name");
            }
            !reserved
        })
        .map(|(name, entry)| (name.to_string(), entry.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryRepository {
        builtin: AliasTable,
        user: Mutex<AliasTable>,
        saves: Mutex<usize>,
        fail_saves: bool,
    }

    impl AliasRepository for MemoryRepository {
        fn load_builtin(&self) -> Result<AliasTable> {
            Ok(self.builtin.clone())
        }

        fn load_user(&self) -> Result<AliasTable> {
            Ok(self.user.lock().unwrap().clone())
        }

        fn save_user(&self, table: &AliasTable) -> Result<()> {
            *self.saves.lock().unwrap() += 1;
            if self.fail_saves {
                return Err(ChatshError::io("disk full"));
            }
            *self.user.lock().unwrap() = table.clone();
            Ok(())
        }
    }

    struct BrokenRepository;

    impl AliasRepository for BrokenRepository {
        fn load_builtin(&self) -> Result<AliasTable> {
            Err(ChatshError::Serialization {
                format: "TOML".to_string(),
                message: "expected `=`".to_string(),
            })
        }

        fn load_user(&self) -> Result<AliasTable> {
            Err(ChatshError::io("permission denied"))
        }

        fn save_user(&self, _table: &AliasTable) -> Result<()> {
            Ok(())
        }
    }

    fn repository_with_builtin() -> Arc<MemoryRepository> {
        Arc::new(MemoryRepository {
            builtin: [("up", AliasEntry::with_description("uptime", "load average"))]
                .into_iter()
                .collect(),
            ..Default::default()
        })
    }

    #[test]
    fn test_load_failures_yield_empty_tables() {
        let store = AliasStore::load(Arc::new(BrokenRepository));
        assert!(store.builtin().is_empty());
        assert!(store.user().is_empty());
    }

    #[test]
    fn test_load_skips_reserved_builtin_names() {
        let repository = Arc::new(MemoryRepository {
            builtin: [
                ("sudo", AliasEntry::new("rm -rf /")),
                ("up", AliasEntry::new("uptime")),
            ]
            .into_iter()
            .collect(),
            ..Default::default()
        });
        let store = AliasStore::load(repository);

        assert!(store.lookup("sudo").is_none());
        assert!(store.lookup("up").is_some());
    }

    #[test]
    fn test_create_and_lookup_are_case_insensitive() {
        let repository = repository_with_builtin();
        let mut store = AliasStore::load(repository.clone());

        store.create_or_update("Greet", "echo ?").unwrap();

        let (entry, source) = store.lookup("GREET").unwrap();
        assert_eq!(entry.command, "echo ?");
        assert_eq!(source, AliasSource::User);
        assert!(repository.user.lock().unwrap().contains("greet"));
    }

    #[test]
    fn test_reserved_names_leave_tables_unchanged() {
        let repository = repository_with_builtin();
        let mut store = AliasStore::load(repository.clone());
        let builtin_before = store.builtin().clone();

        for verb in crate::alias::RESERVED_VERBS {
            let err = store.create_or_update(&verb.to_uppercase(), "echo nope").unwrap_err();
            assert!(err.is_reserved_name());
        }

        assert_eq!(store.builtin(), &builtin_before);
        assert!(store.user().is_empty());
        assert_eq!(*repository.saves.lock().unwrap(), 0);
    }

    #[test]
    fn test_update_preserves_description() {
        let mut store = AliasStore::load(repository_with_builtin());
        store.create_or_update("disk", "df").unwrap();
        store.set_description("DISK", "free space").unwrap();
        store.create_or_update("disk", "df -h").unwrap();

        let (entry, _) = store.lookup("disk").unwrap();
        assert_eq!(entry.command, "df -h");
        assert_eq!(entry.description.as_deref(), Some("free space"));
    }

    #[test]
    fn test_describe_missing_or_builtin_alias_is_not_found() {
        let mut store = AliasStore::load(repository_with_builtin());

        assert!(store.set_description("nothing", "text").unwrap_err().is_not_found());
        assert!(store.set_description("up", "text").unwrap_err().is_not_found());
        assert_eq!(
            store.builtin().get("up").and_then(|e| e.description.as_deref()),
            Some("load average")
        );
    }

    #[test]
    fn test_builtin_wins_over_user_alias() {
        let mut store = AliasStore::load(repository_with_builtin());
        store.create_or_update("up", "echo shadow").unwrap();

        let (entry, source) = store.lookup("up").unwrap();
        assert_eq!(source, AliasSource::Builtin);
        assert_eq!(entry.command, "uptime");
    }

    #[test]
    fn test_save_failure_keeps_memory_state() {
        let repository = Arc::new(MemoryRepository {
            fail_saves: true,
            ..Default::default()
        });
        let mut store = AliasStore::load(repository.clone());

        store.create_or_update("greet", "echo hi").unwrap();

        assert!(store.lookup("greet").is_some());
        assert_eq!(*repository.saves.lock().unwrap(), 1);
        assert!(repository.user.lock().unwrap().is_empty());
    }

    #[test]
    fn test_reload_picks_up_external_changes() {
        let repository = repository_with_builtin();
        let mut store = AliasStore::load(repository.clone());
        repository
            .user
            .lock()
            .unwrap()
            .insert("ls", AliasEntry::new("ls -la"));

        assert!(store.lookup("ls").is_none());
        store.reload();
        assert!(store.lookup("ls").is_some());
    }

    #[test]
    fn test_malformed_name_is_usage_error() {
        let mut store = AliasStore::load(repository_with_builtin());
        assert!(matches!(
            store.create_or_update("   ", "echo"),
            Err(ChatshError::Usage(_))
        ));
        assert!(matches!(
            store.create_or_update("greet", "  "),
            Err(ChatshError::Usage(_))
        ));
    }
}
