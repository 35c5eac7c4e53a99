//! Plain-text SessionRepository implementation.
//!
//! The file holds comma-joined session identifiers. An empty file, a missing
//! file, or the single value `0` all mean "no session"; a single identifier
//! is simply a one-element set.

use std::collections::BTreeSet;
use std::path::PathBuf;

use tracing::warn;

use chatsh_core::error::Result;
use chatsh_core::session::{SessionId, SessionRepository};

use crate::paths::ChatshPaths;
use crate::storage::AtomicTextFile;

/// Value written when no session is authorized.
pub const NO_SESSION: &str = "0";

pub struct FileSessionRepository {
    file: AtomicTextFile,
}

impl FileSessionRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: AtomicTextFile::new(path),
        }
    }

    pub fn from_paths(paths: &ChatshPaths) -> Self {
        Self::new(paths.sessions_file())
    }
}

/// Parses the persisted form. Malformed entries are skipped with a warning.
pub fn parse_sessions(content: &str) -> BTreeSet<SessionId> {
    content
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty() && *id != NO_SESSION)
        .filter_map(|id| match id.parse::<SessionId>() {
            Ok(session) => Some(session),
            Err(e) => {
                warn!(error = %e, "Skipping malformed session identifier");
                None
            }
        })
        .collect()
}

/// Formats a set for persistence.
pub fn format_sessions(sessions: &BTreeSet<SessionId>) -> String {
    if sessions.is_empty() {
        return NO_SESSION.to_string();
    }
    sessions
        .iter()
        .map(SessionId::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

impl SessionRepository for FileSessionRepository {
    fn load(&self) -> Result<BTreeSet<SessionId>> {
        Ok(self
            .file
            .load()?
            .map(|content| parse_sessions(&content))
            .unwrap_or_default())
    }

    fn save(&self, sessions: &BTreeSet<SessionId>) -> Result<()> {
        self.file.save(&format_sessions(sessions))?;
        Ok(())
    }
}
