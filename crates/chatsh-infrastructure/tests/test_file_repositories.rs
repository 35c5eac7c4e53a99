use std::fs;
use std::sync::Arc;

use chatsh_core::alias::{AliasSource, AliasStore};
use chatsh_core::{SessionId, SessionRegistry};
use chatsh_infrastructure::{ChatshPaths, FileSessionRepository, TomlAliasRepository};
use tempfile::TempDir;

fn setup() -> (TempDir, ChatshPaths) {
    let temp_dir = TempDir::new().unwrap();
    let paths = ChatshPaths::new(temp_dir.path());
    (temp_dir, paths)
}

#[test]
fn test_user_alias_survives_restart() {
    let (_dir, paths) = setup();

    let mut store = AliasStore::load(Arc::new(TomlAliasRepository::from_paths(&paths)));
    store.create_or_update("greet", "echo ${*}").unwrap();
    store.set_description("greet", "Say something back").unwrap();

    let content = fs::read_to_string(paths.user_aliases_file()).unwrap();
    assert!(content.contains("[aliases.greet]"));

    let reloaded = AliasStore::load(Arc::new(TomlAliasRepository::from_paths(&paths)));
    let (entry, source) = reloaded.lookup("greet").unwrap();
    assert_eq!(source, AliasSource::User);
    assert_eq!(entry.command, "echo ${*}");
    assert_eq!(entry.description.as_deref(), Some("Say something back"));
}

#[test]
fn test_builtin_file_is_read_not_written() {
    let (_dir, paths) = setup();
    let builtin = "[aliases.up]\ncommand = \"uptime\"\n";
    fs::write(paths.builtin_aliases_file(), builtin).unwrap();

    let mut store = AliasStore::load(Arc::new(TomlAliasRepository::from_paths(&paths)));
    assert_eq!(store.lookup("UP").unwrap().1, AliasSource::Builtin);

    store.create_or_update("up", "w").unwrap();
    assert_eq!(store.lookup("up").unwrap().0.command, "uptime");
    assert_eq!(fs::read_to_string(paths.builtin_aliases_file()).unwrap(), builtin);
}

#[test]
fn test_corrupt_user_file_loads_empty() {
    let (_dir, paths) = setup();
    fs::write(paths.user_aliases_file(), "[aliases.broken\ncommand = ").unwrap();

    let store = AliasStore::load(Arc::new(TomlAliasRepository::from_paths(&paths)));
    assert!(store.user().is_empty());
}

#[test]
fn test_reload_picks_up_external_edits() {
    let (_dir, paths) = setup();
    let mut store = AliasStore::load(Arc::new(TomlAliasRepository::from_paths(&paths)));
    assert!(store.builtin().is_empty());

    fs::write(
        paths.builtin_aliases_file(),
        "[aliases.disk]\ncommand = \"df -h\"\ndescription = \"Disk usage\"\n",
    )
    .unwrap();
    store.reload();

    assert_eq!(store.lookup("disk").unwrap().0.command, "df -h");
}

#[test]
fn test_sessions_persist_across_registries() {
    let (_dir, paths) = setup();

    let mut registry = SessionRegistry::new(Arc::new(FileSessionRepository::from_paths(&paths)));
    registry.authorize(&SessionId::from(42_i64));
    registry.authorize(&SessionId::from(-1001_i64));
    assert_eq!(fs::read_to_string(paths.sessions_file()).unwrap(), "-1001,42");

    let mut restored = SessionRegistry::new(Arc::new(FileSessionRepository::from_paths(&paths)));
    let ids = restored.restore();
    assert_eq!(ids.len(), 2);
    assert!(restored.is_authorized(&SessionId::from("42")));

    restored.revoke_all();
    assert_eq!(fs::read_to_string(paths.sessions_file()).unwrap(), "0");
}

#[test]
fn test_legacy_single_session_file() {
    let (_dir, paths) = setup();
    fs::write(paths.sessions_file(), "123456789").unwrap();

    let mut registry = SessionRegistry::new(Arc::new(FileSessionRepository::from_paths(&paths)));
    assert_eq!(registry.restore(), vec![SessionId::from("123456789")]);
}
