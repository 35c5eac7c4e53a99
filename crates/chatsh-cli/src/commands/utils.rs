use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use chatsh_core::{AliasStore, Engine, SessionRegistry};
use chatsh_execution::build_collaborators;
use chatsh_infrastructure::dto::AppConfig;
use chatsh_infrastructure::{
    ChatshPaths, ConfigService, FileSessionRepository, TomlAliasRepository,
};

pub fn resolve_paths(override_dir: Option<PathBuf>) -> Result<ChatshPaths> {
    ChatshPaths::resolve(override_dir).context("Failed to resolve the configuration directory")
}

pub fn alias_store(paths: &ChatshPaths) -> AliasStore {
    AliasStore::load(Arc::new(TomlAliasRepository::from_paths(paths)))
}

pub fn session_registry(paths: &ChatshPaths) -> SessionRegistry {
    SessionRegistry::new(Arc::new(FileSessionRepository::from_paths(paths)))
}

/// Wires the engine to the file-backed repositories and process collaborators.
pub fn build_engine(service: &ConfigService, app: &AppConfig) -> Result<Engine> {
    let config = service
        .engine_config(app)
        .context("Failed to load engine configuration")?;
    let paths = service.paths();
    Ok(Engine::new(
        config,
        build_collaborators(app),
        session_registry(paths),
        alias_store(paths),
    ))
}
