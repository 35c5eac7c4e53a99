//! Alias file format.
//!
//! ```toml
//! [aliases.greet]
//! command = "echo ${*}"
//! description = "Say something back"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use chatsh_core::alias::{AliasEntry, AliasTable};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AliasFile {
    #[serde(default)]
    pub aliases: BTreeMap<String, AliasEntry>,
}

impl From<AliasFile> for AliasTable {
    fn from(file: AliasFile) -> Self {
        file.aliases.into_iter().collect()
    }
}

impl From<&AliasTable> for AliasFile {
    fn from(table: &AliasTable) -> Self {
        Self {
            aliases: table
                .iter()
                .map(|(name, entry)| (name.to_string(), entry.clone()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_alias_file() {
        let content = r#"
            [aliases.Greet]
            command = "echo ?"

            [aliases.df]
            command = "sys df -h"
            description = "Disk usage"
        "#;

        let file: AliasFile = toml::from_str(content).unwrap();
        let table = AliasTable::from(file);

        assert_eq!(table.get("greet").map(|e| e.command.as_str()), Some("echo ?"));
        assert_eq!(
            table.get("DF").and_then(|e| e.description.as_deref()),
            Some("Disk usage")
        );
    }

    #[test]
    fn test_missing_aliases_section_is_empty() {
        let file: AliasFile = toml::from_str("").unwrap();
        assert!(file.aliases.is_empty());
    }
}
