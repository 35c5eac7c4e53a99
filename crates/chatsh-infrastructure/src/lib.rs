//! File-backed storage and configuration for chatsh.

pub mod config_service;
pub mod dto;
pub mod file_session_repository;
pub mod paths;
pub mod storage;
pub mod toml_alias_repository;

pub use crate::config_service::ConfigService;
pub use crate::file_session_repository::FileSessionRepository;
pub use crate::paths::ChatshPaths;
pub use crate::toml_alias_repository::TomlAliasRepository;
