//! Alias domain models.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Normalizes an alias name for storage and lookup.
///
/// Names are compared case-insensitively; keys are normalized once when they
/// enter a table so reads never have to fold stored keys.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Which table an alias was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AliasSource {
    /// Operator-provisioned, read-only at runtime
    Builtin,
    /// Created from the chat by an authorized session
    User,
}

/// A single alias definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasEntry {
    /// Command template; may contain one `${*}` or legacy `?` placeholder
    pub command: String,
    /// Human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl AliasEntry {
    /// Creates an alias without a description.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            description: None,
        }
    }

    /// Creates an alias with a description.
    pub fn with_description(command: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            description: Some(description.into()),
        }
    }
}

/// A table of aliases keyed by normalized name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    entries: BTreeMap<String, AliasEntry>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up an alias by name, ignoring case.
    pub fn get(&self, name: &str) -> Option<&AliasEntry> {
        self.entries.get(&normalize_name(name))
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut AliasEntry> {
        self.entries.get_mut(&normalize_name(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Inserts or replaces an entry, normalizing its name.
    ///
    /// Returns the previous entry stored under the same name, if any.
    pub fn insert(&mut self, name: &str, entry: AliasEntry) -> Option<AliasEntry> {
        self.entries.insert(normalize_name(name), entry)
    }

    /// Iterates entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AliasEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: AsRef<str>> FromIterator<(N, AliasEntry)> for AliasTable {
    fn from_iter<I: IntoIterator<Item = (N, AliasEntry)>>(iter: I) -> Self {
        let mut table = AliasTable::new();
        for (name, entry) in iter {
            table.insert(name.as_ref(), entry);
        }
        table
    }
}
